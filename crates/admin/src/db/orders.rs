//! Order repository (admin side).

use sqlx::PgPool;

use velora_core::table::{Order as Sort, Table};
use velora_core::{Order, OrderId, OrderLine, OrderStatus, StatusUpdate};

use super::RepositoryError;

const ORDERS: Table = Table::new("orders");
const ORDER_ITEM_LINES: Table = Table::new("order_item_lines");

/// Orders shown in the admin list.
pub const RECENT_ORDER_LIMIT: i64 = 200;

/// Repository for orders and their items.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Most recent orders, optionally only those in `status`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_recent(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, RepositoryError> {
        let mut select = ORDERS.select("*");
        if let Some(status) = status {
            select = select.eq("status", status);
        }
        let orders = select
            .order("created_at", Sort::Desc)
            .limit(RECENT_ORDER_LIMIT)
            .fetch_all(self.pool)
            .await?;
        Ok(orders)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this id.
    pub async fn get(&self, id: OrderId) -> Result<Order, RepositoryError> {
        ORDERS
            .select("*")
            .eq("id", id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// The order's items with product names. Items whose product has been
    /// deleted are named "Product".
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, id: OrderId) -> Result<Vec<OrderLine>, RepositoryError> {
        let lines = ORDER_ITEM_LINES
            .select("product_name, quantity, price")
            .eq("order_id", id)
            .fetch_all(self.pool)
            .await?;
        Ok(lines)
    }

    /// Set status, tracking number and estimated delivery.
    ///
    /// Tracking number and delivery date are only overwritten when given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this id.
    pub async fn update_status(
        &self,
        id: OrderId,
        update: &StatusUpdate,
    ) -> Result<Order, RepositoryError> {
        let mut query = ORDERS.update().set("status", update.status);
        if let Some(tracking) = update
            .tracking_number
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            query = query.set("tracking_number", tracking);
        }
        if let Some(date) = update.estimated_delivery {
            query = query.set("estimated_delivery", date);
        }
        query
            .set_now("updated_at")
            .eq("id", id)
            .returning("*")
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}
