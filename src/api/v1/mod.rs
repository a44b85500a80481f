//! v1 API endpoints

pub mod tasks;
pub mod teams;

use axum::Router;

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .nest("/teams", teams::create_teams_router())
        .nest("/tasks", tasks::create_tasks_router())
}
