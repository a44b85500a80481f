//! Teamboard API
//!
//! A team and task collaboration backend:
//! - accounts with email/password authentication and JWT sessions
//! - atomic team provisioning with email-based member resolution
//! - team-scoped task tracking with status and search filters

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use config::AuthConfig;
use infrastructure::auth::{JwtConfig, JwtService};
use infrastructure::db;
use infrastructure::task::{InMemoryTaskRepository, PostgresTaskRepository, TaskService};
use infrastructure::team::{InMemoryTeamRepository, PostgresTeamRepository, TeamService};
use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService,
};
use rand::Rng;
use tracing::{info, warn};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
///
/// With a database URL configured the PostgreSQL backend is used and
/// pending migrations are applied on startup; without one everything runs
/// against the in-memory backend.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let jwt_service = Arc::new(JwtService::new(JwtConfig::new(
        resolve_jwt_secret(config),
        config.auth.token_expiration_hours,
    )));

    let password_hasher = Arc::new(Argon2Hasher::new());

    let database_url = config
        .database
        .url
        .clone()
        .or_else(|| std::env::var("DATABASE_URL").ok());

    let state = if let Some(url) = database_url {
        info!("Connecting to PostgreSQL...");

        let pg_config = db::PostgresConfig::new(url)
            .with_max_connections(config.database.max_connections)
            .with_min_connections(config.database.min_connections);

        let pool = db::connect(&pg_config).await?;
        db::run_schema_migrations(&pool).await?;

        info!("PostgreSQL connection established");

        let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
        let team_repository = Arc::new(PostgresTeamRepository::new(pool.clone()));
        let task_repository = Arc::new(PostgresTaskRepository::new(pool));

        AppState::new(
            Arc::new(UserService::new(user_repository.clone(), password_hasher)),
            Arc::new(TeamService::new(team_repository.clone(), user_repository)),
            Arc::new(TaskService::new(task_repository, team_repository)),
            jwt_service,
        )
    } else {
        info!("No database URL configured, using in-memory backend");

        let user_repository = Arc::new(InMemoryUserRepository::new());
        let team_repository = Arc::new(InMemoryTeamRepository::new(user_repository.clone()));
        let task_repository = Arc::new(InMemoryTaskRepository::new());

        AppState::new(
            Arc::new(UserService::new(user_repository.clone(), password_hasher)),
            Arc::new(TeamService::new(team_repository.clone(), user_repository)),
            Arc::new(TaskService::new(task_repository, team_repository)),
            jwt_service,
        )
    };

    Ok(state)
}

/// Resolve the JWT signing secret from env, config, or a random fallback
fn resolve_jwt_secret(config: &AppConfig) -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        return secret;
    }

    if config.auth.jwt_secret != AuthConfig::default().jwt_secret {
        return config.auth.jwt_secret.clone();
    }

    warn!(
        "No JWT secret configured. Generating a random one; \
        sessions will NOT persist across restarts. Set JWT_SECRET \
        or APP__AUTH__JWT_SECRET for persistent sessions."
    );
    generate_random_secret()
}

fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
