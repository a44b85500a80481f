//! Migrate command - applies pending schema migrations and exits

use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::db::{self, run_schema_migrations, PostgresMigrator};
use crate::infrastructure::logging;

/// Run pending migrations against the configured database
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let url = config
        .database
        .url
        .clone()
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .ok_or_else(|| anyhow::anyhow!("No database URL configured; set APP__DATABASE__URL or DATABASE_URL"))?;

    let pg_config = db::PostgresConfig::new(url)
        .with_max_connections(config.database.max_connections)
        .with_min_connections(config.database.min_connections);

    let pool = db::connect(&pg_config).await?;

    run_schema_migrations(&pool).await?;

    let version = PostgresMigrator::new(pool).current_version().await?;
    info!(version = ?version, "Migrations applied");

    Ok(())
}
