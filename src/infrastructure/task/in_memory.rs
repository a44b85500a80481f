//! In-memory task repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::task::{Task, TaskId, TaskQuery, TaskRepository};
use crate::domain::team::TeamId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of TaskRepository
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn get(&self, id: &TaskId) -> Result<Option<Task>, DomainError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(id).cloned())
    }

    async fn create(&self, task: Task) -> Result<Task, DomainError> {
        let mut tasks = self.tasks.write().await;

        if tasks.contains_key(&task.id()) {
            return Err(DomainError::conflict(format!(
                "Task with ID '{}' already exists",
                task.id()
            )));
        }

        tasks.insert(task.id(), task.clone());
        Ok(task)
    }

    async fn update(&self, task: &Task) -> Result<Task, DomainError> {
        let mut tasks = self.tasks.write().await;

        if !tasks.contains_key(&task.id()) {
            return Err(DomainError::not_found(format!(
                "Task '{}' not found",
                task.id()
            )));
        }

        tasks.insert(task.id(), task.clone());
        Ok(task.clone())
    }

    async fn delete(&self, id: &TaskId) -> Result<bool, DomainError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.remove(id).is_some())
    }

    async fn list_for_team(
        &self,
        team_id: &TeamId,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, DomainError> {
        let tasks = self.tasks.read().await;

        let mut result: Vec<Task> = tasks
            .values()
            .filter(|t| t.team_id() == *team_id && query.matches(t))
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(result)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, DomainError> {
        let tasks = self.tasks.read().await;

        let mut result: Vec<Task> = tasks
            .values()
            .filter(|t| {
                (t.assigned_to() == Some(*user_id) || t.created_by() == *user_id)
                    && query.matches(t)
            })
            .cloned()
            .collect();

        // Due date ascending, undated tasks last
        result.sort_by(|a, b| match (a.due_date(), b.due_date()) {
            (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.created_at().cmp(&b.created_at()),
        });

        Ok(result)
    }
}
