//! Team API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Router,
};
use serde::{Deserialize, Serialize};

use super::tasks;
use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::team::Team;
use crate::infrastructure::team::{MemberDetails, ProvisionTeamRequest};

/// Create the team router
pub fn create_teams_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teams).post(provision_team))
        .route("/{id}", get(get_team).delete(delete_team))
        .route("/{id}/members", get(list_members).post(add_member))
        .route("/{id}/members/{user_id}", delete(remove_member))
        .route(
            "/{id}/tasks",
            get(tasks::list_team_tasks).post(tasks::create_task),
        )
}

/// Request body for provisioning a team
#[derive(Debug, Deserialize)]
pub struct ProvisionTeamBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Candidate member emails, resolved against existing accounts
    #[serde(default)]
    pub member_emails: Vec<String>,
}

/// Team representation
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TeamResponse {
    fn from_team(team: &Team) -> Self {
        Self {
            id: team.id().to_string(),
            name: team.name().to_string(),
            description: team.description().map(str::to_string),
            created_at: team.created_at().to_rfc3339(),
            updated_at: team.updated_at().to_rfc3339(),
        }
    }
}

/// Provisioning response: the new team plus the candidate emails that
/// matched no existing account
#[derive(Debug, Serialize)]
pub struct ProvisionResponse {
    pub team: TeamResponse,
    pub unresolved_emails: Vec<String>,
}

/// Team list response
#[derive(Debug, Serialize)]
pub struct TeamListResponse {
    pub teams: Vec<TeamResponse>,
}

/// Member representation
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub user_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: String,
    pub joined_at: String,
}

impl MemberResponse {
    fn from_details(details: &MemberDetails) -> Self {
        Self {
            user_id: details.user_id.to_string(),
            email: details.email.clone(),
            name: details.name.clone(),
            role: details.role.to_string(),
            joined_at: details.joined_at.to_rfc3339(),
        }
    }
}

/// Member list response
#[derive(Debug, Serialize)]
pub struct MemberListResponse {
    pub members: Vec<MemberResponse>,
}

/// Request body for adding a member by email
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub email: String,
}

/// List teams the current user belongs to
///
/// GET /v1/teams
pub async fn list_teams(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<TeamListResponse>, ApiError> {
    let teams = state.team_service.list(user.id()).await?;

    Ok(Json(TeamListResponse {
        teams: teams.iter().map(TeamResponse::from_team).collect(),
    }))
}

/// Provision a new team
///
/// POST /v1/teams
///
/// Atomically creates the team, attaches the caller as admin, and attaches
/// every candidate email that matches an existing account as a member.
/// Emails that match nothing come back in `unresolved_emails`.
pub async fn provision_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<ProvisionTeamBody>,
) -> Result<(StatusCode, Json<ProvisionResponse>), ApiError> {
    let outcome = state
        .team_service
        .provision(
            user.id(),
            ProvisionTeamRequest {
                name: body.name,
                description: body.description,
                member_emails: body.member_emails,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProvisionResponse {
            team: TeamResponse::from_team(&outcome.team),
            unresolved_emails: outcome.unresolved_emails,
        }),
    ))
}

/// Get a team by ID
///
/// GET /v1/teams/{id}
pub async fn get_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state.team_service.get(user.id(), &id).await?;
    Ok(Json(TeamResponse::from_team(&team)))
}

/// Delete a team (admins only)
///
/// DELETE /v1/teams/{id}
pub async fn delete_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.team_service.delete(user.id(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List team members (members only)
///
/// GET /v1/teams/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<MemberListResponse>, ApiError> {
    let members = state.team_service.members(user.id(), &id).await?;

    Ok(Json(MemberListResponse {
        members: members.iter().map(MemberResponse::from_details).collect(),
    }))
}

/// Add a member by email (members only)
///
/// POST /v1/teams/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Json(request): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let details = state
        .team_service
        .add_member(user.id(), &id, &request.email)
        .await?;

    Ok((StatusCode::CREATED, Json(MemberResponse::from_details(&details))))
}

/// Remove a member (admins only, no self-removal)
///
/// DELETE /v1/teams/{id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .team_service
        .remove_member(user.id(), &id, &user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
