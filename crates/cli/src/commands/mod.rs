//! CLI subcommands.

pub mod migrate;
pub mod notify;
pub mod seed;

use sqlx::PgPool;
use velora_admin::config::AdminConfig;
use velora_admin::db;

/// Connect to the database named by `ADMIN_DATABASE_URL` or `DATABASE_URL`.
pub(crate) async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let database_url = AdminConfig::database_url_from_env()?;
    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&database_url).await?)
}
