//! Task service
//!
//! All team-scoped operations check the requester's membership through the
//! team repository before touching tasks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::task::{
    validate_task_description, validate_task_title, Task, TaskId, TaskQuery, TaskRepository,
    TaskStatus,
};
use crate::domain::team::{TeamId, TeamRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Request for creating a task
#[derive(Debug, Clone)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
}

/// Request for updating a task; `None` fields are left unchanged, except
/// `clear_assignee` which unassigns explicitly
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub clear_assignee: bool,
}

/// Task service
#[derive(Debug)]
pub struct TaskService<T: TaskRepository, M: TeamRepository> {
    tasks: Arc<T>,
    teams: Arc<M>,
}

impl<T: TaskRepository, M: TeamRepository> TaskService<T, M> {
    /// Create a new task service
    pub fn new(tasks: Arc<T>, teams: Arc<M>) -> Self {
        Self { tasks, teams }
    }

    /// Create a task in a team; the requester must be a member
    pub async fn create(
        &self,
        requester: UserId,
        team_id: &str,
        request: CreateTaskRequest,
    ) -> Result<Task, DomainError> {
        let team_id = parse_team_id(team_id)?;
        self.require_membership(&team_id, &requester).await?;

        validate_task_title(&request.title)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if let Some(ref description) = request.description {
            validate_task_description(description)
                .map_err(|e| DomainError::validation(e.to_string()))?;
        }

        let mut task = Task::new(team_id, request.title, requester)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if let Some(description) = request.description {
            task = task.with_description(description);
        }

        if let Some(due_date) = request.due_date {
            task = task.with_due_date(due_date);
        }

        if let Some(ref assignee) = request.assigned_to {
            let assignee = self.resolve_assignee(&team_id, assignee).await?;
            task = task.with_assignee(assignee);
        }

        info!(task_id = %task.id(), team_id = %team_id, "Creating task");

        self.tasks.create(task).await
    }

    /// Get a task; the requester must be a member of the owning team
    pub async fn get(&self, requester: UserId, id: &str) -> Result<Task, DomainError> {
        let task = self.require_task(id).await?;
        self.require_membership(&task.team_id(), &requester).await?;
        Ok(task)
    }

    /// Update a task's fields
    pub async fn update(
        &self,
        requester: UserId,
        id: &str,
        request: UpdateTaskRequest,
    ) -> Result<Task, DomainError> {
        let mut task = self.require_task(id).await?;
        self.require_membership(&task.team_id(), &requester).await?;

        if let Some(title) = request.title {
            task.set_title(title)
                .map_err(|e| DomainError::validation(e.to_string()))?;
        }

        if let Some(description) = request.description {
            validate_task_description(&description)
                .map_err(|e| DomainError::validation(e.to_string()))?;
            task.set_description(Some(description));
        }

        if let Some(due_date) = request.due_date {
            task.set_due_date(Some(due_date));
        }

        if request.clear_assignee {
            task.set_assignee(None);
        } else if let Some(ref assignee) = request.assigned_to {
            let assignee = self.resolve_assignee(&task.team_id(), assignee).await?;
            task.set_assignee(Some(assignee));
        }

        self.tasks.update(&task).await
    }

    /// Change a task's workflow status
    pub async fn set_status(
        &self,
        requester: UserId,
        id: &str,
        status: &str,
    ) -> Result<Task, DomainError> {
        let mut task = self.require_task(id).await?;
        self.require_membership(&task.team_id(), &requester).await?;

        let status = TaskStatus::parse(status)
            .ok_or_else(|| DomainError::validation(format!("Unknown status '{}'", status)))?;

        task.set_status(status);
        self.tasks.update(&task).await
    }

    /// Delete a task; the requester must be a member of the owning team
    pub async fn delete(&self, requester: UserId, id: &str) -> Result<(), DomainError> {
        let task = self.require_task(id).await?;
        self.require_membership(&task.team_id(), &requester).await?;

        info!(task_id = %task.id(), "Deleting task");

        self.tasks.delete(&task.id()).await?;
        Ok(())
    }

    /// List a team's tasks, newest first; members only
    pub async fn list_for_team(
        &self,
        requester: UserId,
        team_id: &str,
        query: TaskQuery,
    ) -> Result<Vec<Task>, DomainError> {
        let team_id = parse_team_id(team_id)?;
        self.require_membership(&team_id, &requester).await?;

        self.tasks.list_for_team(&team_id, &query).await
    }

    /// List the requester's tasks across teams: everything assigned to or
    /// created by them, due date ascending with undated tasks last
    pub async fn list_for_user(
        &self,
        requester: UserId,
        query: TaskQuery,
    ) -> Result<Vec<Task>, DomainError> {
        self.tasks.list_for_user(&requester, &query).await
    }

    async fn require_task(&self, id: &str) -> Result<Task, DomainError> {
        let task_id = TaskId::parse(id)
            .map_err(|e| DomainError::invalid_id(format!("Invalid task ID: {}", e)))?;

        self.tasks
            .get(&task_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Task '{}' not found", task_id)))
    }

    async fn require_membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        self.teams
            .membership(team_id, user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| DomainError::forbidden("You are not a member of this team"))
    }

    /// An assignee must belong to the task's team
    async fn resolve_assignee(
        &self,
        team_id: &TeamId,
        assignee: &str,
    ) -> Result<UserId, DomainError> {
        let user_id = UserId::parse(assignee)
            .map_err(|e| DomainError::invalid_id(format!("Invalid assignee ID: {}", e)))?;

        if self.teams.membership(team_id, &user_id).await?.is_none() {
            return Err(DomainError::validation(
                "Assignee is not a member of the team",
            ));
        }

        Ok(user_id)
    }
}

fn parse_team_id(id: &str) -> Result<TeamId, DomainError> {
    TeamId::parse(id).map_err(|e| DomainError::invalid_id(format!("Invalid team ID: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{User, UserRepository};
    use crate::infrastructure::task::InMemoryTaskRepository;
    use crate::infrastructure::team::InMemoryTeamRepository;
    use crate::infrastructure::user::InMemoryUserRepository;

    struct Fixture {
        service: TaskService<InMemoryTaskRepository, InMemoryTeamRepository>,
        admin: UserId,
        member: UserId,
        outsider: UserId,
        team_id: TeamId,
    }

    async fn setup() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let teams = Arc::new(InMemoryTeamRepository::new(users.clone()));

        let admin_user = User::new("admin@example.com", "hash");
        let admin = admin_user.id();
        users.create(admin_user).await.unwrap();

        let member_user = User::new("member@example.com", "hash");
        let member = member_user.id();
        users.create(member_user).await.unwrap();

        let outsider_user = User::new("outsider@example.com", "hash");
        let outsider = outsider_user.id();
        users.create(outsider_user).await.unwrap();

        let team = crate::domain::team::Team::new("My Team").unwrap();
        let team_id = team.id();
        teams
            .provision(team, admin, &["member@example.com".to_string()])
            .await
            .unwrap();

        Fixture {
            service: TaskService::new(Arc::new(InMemoryTaskRepository::new()), teams),
            admin,
            member,
            outsider,
            team_id,
        }
    }

    fn create_request(title: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.to_string(),
            description: None,
            due_date: None,
            assigned_to: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let f = setup().await;

        let task = f
            .service
            .create(f.admin, &f.team_id.to_string(), create_request("Write report"))
            .await
            .unwrap();
        assert_eq!(task.status(), TaskStatus::Todo);
        assert_eq!(task.created_by(), f.admin);

        let fetched = f
            .service
            .get(f.member, &task.id().to_string())
            .await
            .unwrap();
        assert_eq!(fetched.title(), "Write report");
    }

    #[tokio::test]
    async fn test_create_requires_membership() {
        let f = setup().await;

        let result = f
            .service
            .create(f.outsider, &f.team_id.to_string(), create_request("Nope"))
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_create_with_assignee() {
        let f = setup().await;

        let task = f
            .service
            .create(
                f.admin,
                &f.team_id.to_string(),
                CreateTaskRequest {
                    title: "Write report".to_string(),
                    description: None,
                    due_date: None,
                    assigned_to: Some(f.member.to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(task.assigned_to(), Some(f.member));
    }

    #[tokio::test]
    async fn test_create_assignee_must_be_member() {
        let f = setup().await;

        let result = f
            .service
            .create(
                f.admin,
                &f.team_id.to_string(),
                CreateTaskRequest {
                    title: "Write report".to_string(),
                    description: None,
                    due_date: None,
                    assigned_to: Some(f.outsider.to_string()),
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_get_requires_membership() {
        let f = setup().await;

        let task = f
            .service
            .create(f.admin, &f.team_id.to_string(), create_request("Secret"))
            .await
            .unwrap();

        let result = f.service.get(f.outsider, &task.id().to_string()).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_update_fields() {
        let f = setup().await;

        let task = f
            .service
            .create(f.admin, &f.team_id.to_string(), create_request("Draft"))
            .await
            .unwrap();

        let updated = f
            .service
            .update(
                f.member,
                &task.id().to_string(),
                UpdateTaskRequest {
                    title: Some("Final".to_string()),
                    description: Some("Reviewed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title(), "Final");
        assert_eq!(updated.description(), Some("Reviewed"));
    }

    #[tokio::test]
    async fn test_update_clear_assignee() {
        let f = setup().await;

        let task = f
            .service
            .create(
                f.admin,
                &f.team_id.to_string(),
                CreateTaskRequest {
                    title: "Write report".to_string(),
                    description: None,
                    due_date: None,
                    assigned_to: Some(f.member.to_string()),
                },
            )
            .await
            .unwrap();

        let updated = f
            .service
            .update(
                f.admin,
                &task.id().to_string(),
                UpdateTaskRequest {
                    clear_assignee: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.assigned_to().is_none());
    }

    #[tokio::test]
    async fn test_set_status() {
        let f = setup().await;

        let task = f
            .service
            .create(f.admin, &f.team_id.to_string(), create_request("Write report"))
            .await
            .unwrap();

        let updated = f
            .service
            .set_status(f.member, &task.id().to_string(), "in_progress")
            .await
            .unwrap();
        assert_eq!(updated.status(), TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn test_set_status_unknown() {
        let f = setup().await;

        let task = f
            .service
            .create(f.admin, &f.team_id.to_string(), create_request("Write report"))
            .await
            .unwrap();

        let result = f
            .service
            .set_status(f.admin, &task.id().to_string(), "DONE")
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let f = setup().await;

        let task = f
            .service
            .create(f.admin, &f.team_id.to_string(), create_request("Write report"))
            .await
            .unwrap();

        f.service
            .delete(f.member, &task.id().to_string())
            .await
            .unwrap();

        let result = f.service.get(f.admin, &task.id().to_string()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_for_team_requires_membership() {
        let f = setup().await;

        let result = f
            .service
            .list_for_team(f.outsider, &f.team_id.to_string(), TaskQuery::new())
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_list_for_user_scoped_to_requester() {
        let f = setup().await;

        f.service
            .create(f.admin, &f.team_id.to_string(), create_request("Mine"))
            .await
            .unwrap();
        f.service
            .create(f.member, &f.team_id.to_string(), create_request("Theirs"))
            .await
            .unwrap();

        let mine = f
            .service
            .list_for_user(f.admin, TaskQuery::new())
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title(), "Mine");
    }

    #[tokio::test]
    async fn test_unknown_task() {
        let f = setup().await;

        let result = f.service.get(f.admin, &TaskId::new().to_string()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
