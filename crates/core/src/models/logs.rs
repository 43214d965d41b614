//! System log entries and their CSV export.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ValidationError, require_text};
use crate::types::{LogLevel, SystemLogId};

/// Most recent entries shown by the log viewer.
pub const LOG_VIEW_LIMIT: i64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct SystemLog {
    pub id: SystemLogId,
    #[cfg_attr(feature = "postgres", sqlx(try_from = "String"))]
    pub level: LogLevel,
    pub category: String,
    pub message: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSystemLog {
    pub level: LogLevel,
    pub category: String,
    pub message: String,
    pub metadata: Option<serde_json::Value>,
}

impl NewSystemLog {
    #[must_use]
    pub fn new(level: LogLevel, category: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            category: category.to_owned(),
            message: message.into(),
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the category or message is blank.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            category: require_text(&self.category, "category", "Please enter a category")?,
            message: require_text(&self.message, "message", "Please enter a message")?,
            ..self
        })
    }
}

/// Entry counts per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LogStats {
    pub info: usize,
    pub warning: usize,
    pub error: usize,
    pub critical: usize,
}

impl LogStats {
    #[must_use]
    pub fn from_logs(logs: &[SystemLog]) -> Self {
        logs.iter().fold(Self::default(), |mut stats, log| {
            match log.level {
                LogLevel::Info => stats.info += 1,
                LogLevel::Warning => stats.warning += 1,
                LogLevel::Error => stats.error += 1,
                LogLevel::Critical => stats.critical += 1,
            }
            stats
        })
    }
}

/// Distinct categories, sorted.
#[must_use]
pub fn log_categories(logs: &[SystemLog]) -> Vec<String> {
    logs.iter()
        .map(|l| l.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Render logs as CSV with the header `Time,Level,Category,Message`.
///
/// Time is `yyyy-MM-dd HH:mm:ss` UTC. The message is always quoted with
/// embedded quotes doubled; the category is quoted only when it needs it.
#[must_use]
pub fn logs_to_csv(logs: &[SystemLog]) -> String {
    let mut csv = String::from("Time,Level,Category,Message\n");
    for log in logs {
        let _ = writeln!(
            csv,
            "{},{},{},\"{}\"",
            log.created_at.format("%Y-%m-%d %H:%M:%S"),
            log.level,
            csv_field(&log.category),
            log.message.replace('"', "\"\""),
        );
    }
    csv
}

/// Export filename stamped with the export time.
#[must_use]
pub fn logs_csv_filename(now: DateTime<Utc>) -> String {
    format!("system-logs-{}.csv", now.format("%Y-%m-%d-%H%M%S"))
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}
