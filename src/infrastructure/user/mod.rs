//! User infrastructure
//!
//! Password hashing with Argon2, in-memory and PostgreSQL repositories, and
//! the user service.

mod in_memory;
mod password;
pub(crate) mod postgres;
mod service;

pub use in_memory::InMemoryUserRepository;
pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres::PostgresUserRepository;
pub use service::{SignupRequest, UserService};
