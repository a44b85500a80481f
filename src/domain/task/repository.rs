//! Task repository trait

use async_trait::async_trait;

use super::entity::{Task, TaskId, TaskStatus};
use crate::domain::team::TeamId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Query parameters for listing tasks
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    /// Filter by status
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring search over title and description
    pub search: Option<String>,
}

impl TaskQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Check whether a task passes this query's filters
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status() != status {
                return false;
            }
        }

        if let Some(ref search) = self.search {
            if !search.is_empty() && !task.matches_search(search) {
                return false;
            }
        }

        true
    }
}

/// Repository for managing tasks
#[async_trait]
pub trait TaskRepository: Send + Sync + std::fmt::Debug {
    /// Get a task by ID
    async fn get(&self, id: &TaskId) -> Result<Option<Task>, DomainError>;

    /// Create a new task
    async fn create(&self, task: Task) -> Result<Task, DomainError>;

    /// Update an existing task
    async fn update(&self, task: &Task) -> Result<Task, DomainError>;

    /// Delete a task by ID
    async fn delete(&self, id: &TaskId) -> Result<bool, DomainError>;

    /// List a team's tasks, newest first
    async fn list_for_team(
        &self,
        team_id: &TeamId,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, DomainError>;

    /// List tasks assigned to or created by a user, due date ascending
    /// with undated tasks last
    async fn list_for_user(
        &self,
        user_id: &UserId,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, DomainError>;
}
