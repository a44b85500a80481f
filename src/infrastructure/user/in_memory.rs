//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    /// Index for email -> user ID lookup
    email_index: Arc<RwLock<HashMap<String, UserId>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial users
    pub fn with_users(users: Vec<User>) -> Self {
        let mut users_map = HashMap::new();
        let mut email_map = HashMap::new();

        for user in users {
            email_map.insert(user.email().to_string(), user.id());
            users_map.insert(user.id(), user);
        }

        Self {
            users: Arc::new(RwLock::new(users_map)),
            email_index: Arc::new(RwLock::new(email_map)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email_index = self.email_index.read().await;

        if let Some(user_id) = email_index.get(email) {
            let users = self.users.read().await;
            return Ok(users.get(user_id).cloned());
        }

        Ok(None)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        let email_index = self.email_index.read().await;
        Ok(email_index.contains_key(email))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        if users.contains_key(&user.id()) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        if email_index.contains_key(user.email()) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                user.email()
            )));
        }

        email_index.insert(user.email().to_string(), user.id());
        users.insert(user.id(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        let existing = users.get(&user.id()).ok_or_else(|| {
            DomainError::not_found(format!("User '{}' not found", user.id()))
        })?;

        if existing.email() != user.email() {
            if email_index.contains_key(user.email()) {
                return Err(DomainError::conflict(format!(
                    "Email '{}' already exists",
                    user.email()
                )));
            }

            email_index.remove(existing.email());
            email_index.insert(user.email().to_string(), user.id());
        }

        users.insert(user.id(), user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        match users.remove(id) {
            Some(user) => {
                email_index.remove(user.email());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_login(&self, id: &UserId) -> Result<(), DomainError> {
        let mut users = self.users.write().await;

        let user = users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        user.record_login();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("alice@example.com", "hash");
        let id = user.id();

        repo.create(user).await.unwrap();

        let fetched = repo.get(&id).await.unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().email(), "alice@example.com");
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new("alice@example.com", "hash"))
            .await
            .unwrap();

        let fetched = repo.get_by_email("alice@example.com").await.unwrap();
        assert!(fetched.is_some());

        // Exact case-sensitive match only
        let fetched = repo.get_by_email("Alice@example.com").await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new("alice@example.com", "hash"))
            .await
            .unwrap();

        let result = repo.create(User::new("alice@example.com", "other")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_email_exists() {
        let repo = InMemoryUserRepository::new();
        assert!(!repo.email_exists("alice@example.com").await.unwrap());

        repo.create(User::new("alice@example.com", "hash"))
            .await
            .unwrap();
        assert!(repo.email_exists("alice@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_update() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("alice@example.com", "hash");
        let id = user.id();
        repo.create(user).await.unwrap();

        let mut updated = repo.get(&id).await.unwrap().unwrap();
        updated.set_name(Some("Alice".to_string()));
        repo.update(&updated).await.unwrap();

        let fetched = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched.name(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_update_nonexistent() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("ghost@example.com", "hash");

        assert!(repo.update(&user).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_clears_email_index() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("alice@example.com", "hash");
        let id = user.id();
        repo.create(user).await.unwrap();

        assert!(repo.delete(&id).await.unwrap());
        assert!(!repo.email_exists("alice@example.com").await.unwrap());
        assert!(!repo.delete(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_record_login() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("alice@example.com", "hash");
        let id = user.id();
        repo.create(user).await.unwrap();

        repo.record_login(&id).await.unwrap();

        let fetched = repo.get(&id).await.unwrap().unwrap();
        assert!(fetched.last_login_at().is_some());
    }
}
