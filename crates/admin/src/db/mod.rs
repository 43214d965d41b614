//! Database operations for the admin API.
//!
//! Every repository goes through the [`velora_core::table`] client, so the
//! admin and the storefront read and write the same tables the same way.
//!
//! # Migrations
//!
//! Migrations live in the workspace `migrations/` directory and are applied
//! explicitly:
//! ```bash
//! cargo run -p velora-cli -- migrate
//! ```

pub mod coupons;
pub mod faqs;
pub mod help_articles;
pub mod hero_images;
pub mod orders;
pub mod settings;
pub mod system_logs;
pub mod testimonials;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use coupons::CouponRepository;
pub use faqs::FaqRepository;
pub use help_articles::HelpArticleRepository;
pub use hero_images::HeroImageRepository;
pub use orders::OrderRepository;
pub use settings::SettingsRepository;
pub use system_logs::SystemLogRepository;
pub use testimonials::TestimonialRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate coupon code).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique-constraint violation to [`RepositoryError::Conflict`]
    /// with `message`; other errors pass through as `Database`.
    pub(crate) fn unique(err: sqlx::Error, message: &str) -> Self {
        if err
            .as_database_error()
            .is_some_and(|e| e.is_unique_violation())
        {
            Self::Conflict(message.to_owned())
        } else {
            Self::Database(err)
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
