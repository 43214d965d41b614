//! Database operations for the storefront.
//!
//! Reads go through the [`velora_core::table`] client. The few writes that
//! need `ON CONFLICT` or a joined read (cart upsert, wishlist products,
//! coupon row lock at checkout) are plain `sqlx` queries.
//!
//! # Migrations
//!
//! Migrations live in the workspace `migrations/` directory and are applied
//! explicitly:
//! ```bash
//! cargo run -p velora-cli -- migrate
//! ```

pub mod cart;
pub mod catalog;
pub mod content;
pub mod coupons;
pub mod orders;
pub mod settings;
pub mod wishlist;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cart::CartRepository;
pub use catalog::{CatalogRepository, ProductFilter};
pub use content::ContentRepository;
pub use coupons::CouponRepository;
pub use orders::OrderRepository;
pub use settings::SettingsRepository;
pub use wishlist::WishlistRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

impl RepositoryError {
    /// Map a foreign-key violation (e.g. a cart row for a deleted product)
    /// to [`RepositoryError::NotFound`].
    pub(crate) fn missing_reference(err: sqlx::Error) -> Self {
        if err
            .as_database_error()
            .is_some_and(|e| e.is_foreign_key_violation())
        {
            Self::NotFound
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
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
