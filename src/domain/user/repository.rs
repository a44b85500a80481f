//! User repository trait

use async_trait::async_trait;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository for managing user accounts
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    /// Get a user by ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by email (case-sensitive exact match)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Check whether an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError>;

    /// Create a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user by ID
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// Update the last-login timestamp
    async fn record_login(&self, id: &UserId) -> Result<(), DomainError>;
}
