//! Infrastructure layer
//!
//! Concrete implementations of the domain repository traits, the services
//! that sit on top of them, and the supporting plumbing (database, auth
//! tokens, logging).

pub mod auth;
pub mod db;
pub mod logging;
pub mod task;
pub mod team;
pub mod user;
