//! Site settings database operations.
//!
//! Settings are `site_settings(key, value JSONB)` rows read as a whole into
//! a [`SiteSettings`] map.

use serde_json::Value as JsonValue;
use sqlx::PgPool;

use velora_core::table::{Order, Table};
use velora_core::{SiteSetting, SiteSettings};

use super::RepositoryError;

const SITE_SETTINGS: Table = Table::new("site_settings");

/// Repository for `site_settings`.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every setting as a key/value map.
    ///
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

    /// Insert or replace one setting.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(&self, key: &str, value: &JsonValue) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO site_settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Insert a setting only if the key is absent. Returns whether it was
    /// inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_default(
        &self,
        key: &str,
        value: &JsonValue,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO site_settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO NOTHING
            ",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
