//! Database migration command.
//!
//! Applies every pending migration under the workspace `migrations/`
//! directory. The servers never migrate on startup.

use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Migration error from sqlx.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails
/// or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let migrator = sqlx::migrate!("../../migrations");
    tracing::info!(available = migrator.iter().count(), "Running migrations...");
    migrator.run(&pool).await.map_err(MigrationError::from)?;

    tracing::info!("Migrations complete!");
    Ok(())
}
