//! Task API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::task::{Task, TaskQuery, TaskStatus};
use crate::infrastructure::task::{CreateTaskRequest, UpdateTaskRequest};

/// Create the task router (task-scoped routes)
pub fn create_tasks_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_my_tasks))
        .route("/{id}", get(get_task).put(update_task).delete(delete_task))
        .route("/{id}/status", post(set_task_status))
}

/// Query parameters for task listings
#[derive(Debug, Deserialize, Default)]
pub struct TaskListParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl TaskListParams {
    fn into_query(self) -> Result<TaskQuery, ApiError> {
        let mut query = TaskQuery::new();

        if let Some(status) = self.status {
            let status = TaskStatus::parse(&status).ok_or_else(|| {
                ApiError::bad_request(format!("Unknown status '{}'", status)).with_param("status")
            })?;
            query = query.with_status(status);
        }

        if let Some(search) = self.search {
            query = query.with_search(search);
        }

        Ok(query)
    }
}

/// Request body for creating a task
#[derive(Debug, Deserialize)]
pub struct CreateTaskBody {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

/// Request body for updating a task
#[derive(Debug, Deserialize, Default)]
pub struct UpdateTaskBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub clear_assignee: bool,
}

/// Request body for changing a task's status
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// Task representation
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub team_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TaskResponse {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id().to_string(),
            team_id: task.team_id().to_string(),
            title: task.title().to_string(),
            description: task.description().map(str::to_string),
            status: task.status().to_string(),
            due_date: task.due_date().map(|d| d.to_rfc3339()),
            created_by: task.created_by().to_string(),
            assigned_to: task.assigned_to().map(|u| u.to_string()),
            created_at: task.created_at().to_rfc3339(),
            updated_at: task.updated_at().to_rfc3339(),
        }
    }
}

/// Task list response
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
}

/// List the current user's tasks across teams
///
/// GET /v1/tasks?status=&search=
///
/// Everything assigned to or created by the caller, due date ascending with
/// undated tasks last.
pub async fn list_my_tasks(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(params): Query<TaskListParams>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let query = params.into_query()?;
    let tasks = state.task_service.list_for_user(user.id(), query).await?;

    Ok(Json(TaskListResponse {
        tasks: tasks.iter().map(TaskResponse::from_task).collect(),
    }))
}

/// List a team's tasks, newest first (members only)
///
/// GET /v1/teams/{id}/tasks?status=&search=
pub async fn list_team_tasks(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Query(params): Query<TaskListParams>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let query = params.into_query()?;
    let tasks = state
        .task_service
        .list_for_team(user.id(), &id, query)
        .await?;

    Ok(Json(TaskListResponse {
        tasks: tasks.iter().map(TaskResponse::from_task).collect(),
    }))
}

/// Create a task in a team (members only)
///
/// POST /v1/teams/{id}/tasks
pub async fn create_task(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Json(body): Json<CreateTaskBody>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let task = state
        .task_service
        .create(
            user.id(),
            &id,
            CreateTaskRequest {
                title: body.title,
                description: body.description,
                due_date: body.due_date,
                assigned_to: body.assigned_to,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from_task(&task))))
}

/// Get a task by ID
///
/// GET /v1/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state.task_service.get(user.id(), &id).await?;
    Ok(Json(TaskResponse::from_task(&task)))
}

/// Update a task's fields
///
/// PUT /v1/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateTaskBody>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .task_service
        .update(
            user.id(),
            &id,
            UpdateTaskRequest {
                title: body.title,
                description: body.description,
                due_date: body.due_date,
                assigned_to: body.assigned_to,
                clear_assignee: body.clear_assignee,
            },
        )
        .await?;

    Ok(Json(TaskResponse::from_task(&task)))
}

/// Change a task's workflow status
///
/// POST /v1/tasks/{id}/status
pub async fn set_task_status(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .task_service
        .set_status(user.id(), &id, &request.status)
        .await?;

    Ok(Json(TaskResponse::from_task(&task)))
}

/// Delete a task
///
/// DELETE /v1/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.task_service.delete(user.id(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
