//! System log repository.

use sqlx::PgPool;

use velora_core::table::{Order, Table};
use velora_core::{LOG_VIEW_LIMIT, ListQuery, NewSystemLog, SystemLog, SystemLogId};

use super::RepositoryError;

const SYSTEM_LOGS: Table = Table::new("system_logs");

/// Repository for `system_logs`.
pub struct SystemLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SystemLogRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The latest [`LOG_VIEW_LIMIT`] entries, newest first, unfiltered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent(&self) -> Result<Vec<SystemLog>, RepositoryError> {
        let logs = SYSTEM_LOGS
            .select("*")
            .order("created_at", Order::Desc)
            .limit(LOG_VIEW_LIMIT)
            .fetch_all(self.pool)
            .await?;
        Ok(logs)
    }

    /// The latest entries narrowed by `query` (search, level, category).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<SystemLog>, RepositoryError> {
        Ok(query.apply(self.recent().await?))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, log: &NewSystemLog) -> Result<SystemLog, RepositoryError> {
        let log = SYSTEM_LOGS
            .insert()
            .set("level", log.level)
            .set("category", log.category.as_str())
            .set("message", log.message.as_str())
            .set("metadata", log.metadata.clone())
            .returning("*")
            .fetch_one(self.pool)
            .await?;
        Ok(log)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no entry has this id.
    pub async fn delete(&self, id: SystemLogId) -> Result<(), RepositoryError> {
        let deleted = SYSTEM_LOGS
            .delete()
            .eq("id", id)
            .execute(self.pool)
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete every entry. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self) -> Result<u64, RepositoryError> {
        Ok(SYSTEM_LOGS.delete().all().execute(self.pool).await?)
    }
}
