//! Site settings, read as a whole.

use sqlx::PgPool;

use velora_core::table::{Order, Table};
use velora_core::{SiteSetting, SiteSettings};

use super::RepositoryError;

const SITE_SETTINGS: Table = Table::new("site_settings");

/// Read access to `site_settings`.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn load_all(&self) -> Result<SiteSettings, RepositoryError> {
        let rows: Vec<SiteSetting> = SITE_SETTINGS
            .select("key, value")
            .order("key", Order::Asc)
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().collect())
    }
}
