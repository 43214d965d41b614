//! Wishlist repository.

use sqlx::PgPool;

use velora_core::table::{Order, Table};
use velora_core::{Product, ProductId, ShopperId};

use super::RepositoryError;

const WISHLIST_ITEMS: Table = Table::new("wishlist_items");

#[derive(sqlx::FromRow)]
struct WishlistRow {
    product_id: ProductId,
}

/// Repository for a shopper's wishlist.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Wishlisted product ids, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_ids(&self, shopper: ShopperId) -> Result<Vec<ProductId>, RepositoryError> {
        let rows: Vec<WishlistRow> = WISHLIST_ITEMS
            .select("product_id")
            .eq("shopper_id", shopper)
            .order("created_at", Order::Desc)
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.product_id).collect())
    }

    /// Wishlisted products, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products(&self, shopper: ShopperId) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT p.*
            FROM wishlist_items w
            JOIN products p ON p.id = w.product_id
            WHERE w.shopper_id = $1
            ORDER BY w.created_at DESC
            ",
        )
        .bind(shopper)
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// Add a product. Returns whether it was newly added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn add(&self, shopper: ShopperId, product: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO wishlist_items (shopper_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT (shopper_id, product_id) DO NOTHING
            ",
        )
        .bind(shopper)
        .bind(product)
        .execute(self.pool)
        .await
        .map_err(RepositoryError::missing_reference)?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a product. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &self,
        shopper: ShopperId,
        product: ProductId,
    ) -> Result<bool, RepositoryError> {
        let deleted = WISHLIST_ITEMS
            .delete()
            .eq("shopper_id", shopper)
            .eq("product_id", product)
            .execute(self.pool)
            .await?;
        Ok(deleted > 0)
    }

    /// Remove the product if present, add it otherwise.
    ///
    /// Returns whether the product is in the wishlist afterwards.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn toggle(
        &self,
        shopper: ShopperId,
        product: ProductId,
    ) -> Result<bool, RepositoryError> {
        if self.remove(shopper, product).await? {
            return Ok(false);
        }
        self.add(shopper, product).await?;
        Ok(true)
    }
}
