//! User service for signup, authentication and account management

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{
    validate_display_name, validate_email, validate_password, User, UserId, UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for creating a new account
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// User service for authentication and management
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Create a new account
    pub async fn signup(&self, request: SignupRequest) -> Result<User, DomainError> {
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if let Some(ref name) = request.name {
            validate_display_name(name).map_err(|e| DomainError::validation(e.to_string()))?;
        }

        if self.repository.email_exists(&request.email).await? {
            return Err(DomainError::conflict(
                "A user with the provided email address exists already",
            ));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let mut user = User::new(&request.email, password_hash);

        if let Some(name) = request.name {
            user = user.with_name(name);
        }

        info!(user_id = %user.id(), "Creating user account");

        self.repository.create(user).await
    }

    /// Authenticate a user with email and password.
    ///
    /// Returns `None` for unknown email, wrong password, or a suspended
    /// account; callers must not distinguish the three.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let user = match self.repository.get_by_email(email).await? {
            Some(u) => u,
            None => {
                debug!("Authentication failed: unknown email");
                return Ok(None);
            }
        };

        if !user.is_active() {
            debug!(user_id = %user.id(), "Authentication failed: account suspended");
            return Ok(None);
        }

        if !self.hasher.verify(password, user.password_hash()) {
            debug!(user_id = %user.id(), "Authentication failed: wrong password");
            return Ok(None);
        }

        self.repository.record_login(&user.id()).await?;

        self.repository.get(&user.id()).await
    }

    /// Get a user by ID
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = UserId::parse(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        self.repository.get(&user_id).await
    }

    /// Change a user's password after verifying the current one
    pub async fn change_password(
        &self,
        id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        validate_password(new_password).map_err(|e| DomainError::validation(e.to_string()))?;

        let mut user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if !self.hasher.verify(current_password, user.password_hash()) {
            return Err(DomainError::credential("Current password is incorrect"));
        }

        let new_hash = self.hasher.hash(new_password)?;
        user.set_password_hash(new_hash);

        self.repository.update(&user).await?;
        Ok(())
    }
}
