//! Session layer backed by `PostgreSQL`.
//!
//! The session only carries the anonymous shopper id; cart and wishlist
//! rows live in their own tables keyed by that id.

use sqlx::PgPool;
use tower_sessions::cookie::{SameSite, time::Duration};
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "velora_session";

/// Idle time after which a shopper's session (and so their cart) is dropped.
const SESSION_IDLE_DAYS: i64 = 30;

/// Create the session layer. The `tower_sessions.session` table comes from
/// the workspace migrations.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> SessionManagerLayer<PostgresStore> {
    SessionManagerLayer::new(PostgresStore::new(pool.clone()))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_IDLE_DAYS)))
        .with_secure(config.is_https())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// How often expired session rows are purged.
const CLEANUP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60 * 60);

/// Purge expired sessions hourly for the life of the process.
pub fn spawn_session_cleanup(pool: PgPool) -> tokio::task::JoinHandle<()> {
    let store = PostgresStore::new(pool);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match store.delete_expired().await {
                Ok(()) => tracing::debug!("Expired sessions purged"),
                Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions"),
            }
        }
    })
}
