//! Cart repository.
//!
//! Rows are keyed by `(shopper_id, product_id)`; reads come from the
//! `cart_lines` view so every line carries its product's current price.

use sqlx::PgPool;

use velora_core::table::{Order, Table};
use velora_core::{CartLine, MAX_LINE_QUANTITY, ProductId, ShopperId};

use super::RepositoryError;

const CART_ITEMS: Table = Table::new("cart_items");
const CART_LINES: Table = Table::new("cart_lines");

/// Repository for a shopper's cart.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Cart lines in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, shopper: ShopperId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = CART_LINES
            .select("*")
            .eq("shopper_id", shopper)
            .order("created_at", Order::Asc)
            .fetch_all(self.pool)
            .await?;
        Ok(lines)
    }

    /// Add `quantity` of a product, merging with an existing line.
    ///
    /// The merged quantity is capped at [`MAX_LINE_QUANTITY`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn add(
        &self,
        shopper: ShopperId,
        product: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO cart_items (shopper_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (shopper_id, product_id)
            DO UPDATE SET quantity = LEAST(cart_items.quantity + EXCLUDED.quantity, $4)
            ",
        )
        .bind(shopper)
        .bind(product)
        .bind(quantity)
        .bind(MAX_LINE_QUANTITY)
        .execute(self.pool)
        .await
        .map_err(RepositoryError::missing_reference)?;

        Ok(())
    }

    /// Set a line's quantity; zero removes the line.
    ///
    /// Returns whether a line was changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_quantity(
        &self,
        shopper: ShopperId,
        product: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        if quantity == 0 {
            return self.remove(shopper, product).await;
        }
        let updated = CART_ITEMS
            .update()
            .set("quantity", quantity)
            .eq("shopper_id", shopper)
            .eq("product_id", product)
            .execute(self.pool)
            .await?;
        Ok(updated > 0)
    }

    /// Remove a product from the cart. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &self,
        shopper: ShopperId,
        product: ProductId,
    ) -> Result<bool, RepositoryError> {
        let deleted = CART_ITEMS
            .delete()
            .eq("shopper_id", shopper)
            .eq("product_id", product)
            .execute(self.pool)
            .await?;
        Ok(deleted > 0)
    }
}
