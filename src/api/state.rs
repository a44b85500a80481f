//! Application state for shared services

use std::sync::Arc;

use crate::domain::task::{Task, TaskQuery, TaskRepository};
use crate::domain::team::{ProvisionOutcome, Team, TeamRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::task::{CreateTaskRequest, TaskService, UpdateTaskRequest};
use crate::infrastructure::team::{MemberDetails, ProvisionTeamRequest, TeamService};
use crate::infrastructure::user::{PasswordHasher, SignupRequest, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub team_service: Arc<dyn TeamServiceTrait>,
    pub task_service: Arc<dyn TaskServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn signup(&self, request: SignupRequest) -> Result<User, DomainError>;
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<Option<User>, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<User>, DomainError>;
    async fn change_password(
        &self,
        id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError>;
}

/// Trait for team service operations
#[async_trait::async_trait]
pub trait TeamServiceTrait: Send + Sync {
    async fn provision(
        &self,
        requester: UserId,
        request: ProvisionTeamRequest,
    ) -> Result<ProvisionOutcome, DomainError>;
    async fn get(&self, requester: UserId, id: &str) -> Result<Team, DomainError>;
    async fn list(&self, requester: UserId) -> Result<Vec<Team>, DomainError>;
    async fn delete(&self, requester: UserId, id: &str) -> Result<(), DomainError>;
    async fn members(
        &self,
        requester: UserId,
        id: &str,
    ) -> Result<Vec<MemberDetails>, DomainError>;
    async fn add_member(
        &self,
        requester: UserId,
        id: &str,
        email: &str,
    ) -> Result<MemberDetails, DomainError>;
    async fn remove_member(
        &self,
        requester: UserId,
        id: &str,
        user_id: &str,
    ) -> Result<(), DomainError>;
}

/// Trait for task service operations
#[async_trait::async_trait]
pub trait TaskServiceTrait: Send + Sync {
    async fn create(
        &self,
        requester: UserId,
        team_id: &str,
        request: CreateTaskRequest,
    ) -> Result<Task, DomainError>;
    async fn get(&self, requester: UserId, id: &str) -> Result<Task, DomainError>;
    async fn update(
        &self,
        requester: UserId,
        id: &str,
        request: UpdateTaskRequest,
    ) -> Result<Task, DomainError>;
    async fn set_status(
        &self,
        requester: UserId,
        id: &str,
        status: &str,
    ) -> Result<Task, DomainError>;
    async fn delete(&self, requester: UserId, id: &str) -> Result<(), DomainError>;
    async fn list_for_team(
        &self,
        requester: UserId,
        team_id: &str,
        query: TaskQuery,
    ) -> Result<Vec<Task>, DomainError>;
    async fn list_for_user(
        &self,
        requester: UserId,
        query: TaskQuery,
    ) -> Result<Vec<Task>, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<R: UserRepository + 'static, H: PasswordHasher + 'static> UserServiceTrait
    for UserService<R, H>
{
    async fn signup(&self, request: SignupRequest) -> Result<User, DomainError> {
        UserService::signup(self, request).await
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        UserService::authenticate(self, email, password).await
    }

    async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn change_password(
        &self,
        id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        UserService::change_password(self, id, current_password, new_password).await
    }
}

#[async_trait::async_trait]
impl<T: TeamRepository + 'static, U: UserRepository + 'static> TeamServiceTrait
    for TeamService<T, U>
{
    async fn provision(
        &self,
        requester: UserId,
        request: ProvisionTeamRequest,
    ) -> Result<ProvisionOutcome, DomainError> {
        TeamService::provision(self, requester, request).await
    }

    async fn get(&self, requester: UserId, id: &str) -> Result<Team, DomainError> {
        TeamService::get(self, requester, id).await
    }

    async fn list(&self, requester: UserId) -> Result<Vec<Team>, DomainError> {
        TeamService::list(self, requester).await
    }

    async fn delete(&self, requester: UserId, id: &str) -> Result<(), DomainError> {
        TeamService::delete(self, requester, id).await
    }

    async fn members(
        &self,
        requester: UserId,
        id: &str,
    ) -> Result<Vec<MemberDetails>, DomainError> {
        TeamService::members(self, requester, id).await
    }

    async fn add_member(
        &self,
        requester: UserId,
        id: &str,
        email: &str,
    ) -> Result<MemberDetails, DomainError> {
        TeamService::add_member(self, requester, id, email).await
    }

    async fn remove_member(
        &self,
        requester: UserId,
        id: &str,
        user_id: &str,
    ) -> Result<(), DomainError> {
        TeamService::remove_member(self, requester, id, user_id).await
    }
}

#[async_trait::async_trait]
impl<T: TaskRepository + 'static, M: TeamRepository + 'static> TaskServiceTrait
    for TaskService<T, M>
{
    async fn create(
        &self,
        requester: UserId,
        team_id: &str,
        request: CreateTaskRequest,
    ) -> Result<Task, DomainError> {
        TaskService::create(self, requester, team_id, request).await
    }

    async fn get(&self, requester: UserId, id: &str) -> Result<Task, DomainError> {
        TaskService::get(self, requester, id).await
    }

    async fn update(
        &self,
        requester: UserId,
        id: &str,
        request: UpdateTaskRequest,
    ) -> Result<Task, DomainError> {
        TaskService::update(self, requester, id, request).await
    }

    async fn set_status(
        &self,
        requester: UserId,
        id: &str,
        status: &str,
    ) -> Result<Task, DomainError> {
        TaskService::set_status(self, requester, id, status).await
    }

    async fn delete(&self, requester: UserId, id: &str) -> Result<(), DomainError> {
        TaskService::delete(self, requester, id).await
    }

    async fn list_for_team(
        &self,
        requester: UserId,
        team_id: &str,
        query: TaskQuery,
    ) -> Result<Vec<Task>, DomainError> {
        TaskService::list_for_team(self, requester, team_id, query).await
    }

    async fn list_for_user(
        &self,
        requester: UserId,
        query: TaskQuery,
    ) -> Result<Vec<Task>, DomainError> {
        TaskService::list_for_user(self, requester, query).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        team_service: Arc<dyn TeamServiceTrait>,
        task_service: Arc<dyn TaskServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            user_service,
            team_service,
            task_service,
            jwt_service,
        }
    }
}
