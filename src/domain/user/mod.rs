//! User domain
//!
//! Domain types and traits for user accounts: the entity, credential
//! validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId, UserStatus};
pub use repository::UserRepository;
pub use validation::{
    validate_display_name, validate_email, validate_password, UserValidationError,
};
