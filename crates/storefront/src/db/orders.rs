//! Order repository (shopper side): checkout and order history.

use chrono::Utc;
use sqlx::PgPool;

use velora_core::table::{Order as Sort, Table};
use velora_core::{
    CartLine, Coupon, Order, OrderId, OrderLine, OrderStatus, Product, ShopperId, ValidCheckout,
};

use super::RepositoryError;
use crate::services::checkout::{CheckoutError, PricedLine, price_order};

const ORDERS: Table = Table::new("orders");
const ORDER_ITEMS: Table = Table::new("order_items");
const ORDER_ITEM_LINES: Table = Table::new("order_item_lines");
const CART_ITEMS: Table = Table::new("cart_items");
const CART_LINES: Table = Table::new("cart_lines");
const PRODUCTS: Table = Table::new("products");
const COUPONS: Table = Table::new("coupons");

/// Orders in a shopper's history.
pub const ORDER_HISTORY_LIMIT: i64 = 100;

/// Repository for a shopper's orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a `pending` order in one transaction.
    ///
    /// Lines come from the cart, or from the single buy-now product. Item
    /// prices are snapshotted, the coupon (locked for the duration) is
    /// applied and its usage incremented, product sales counts are bumped
    /// and the cart is cleared unless this was a buy-now order.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] for an empty cart, a missing or
    /// out-of-stock product, an unknown or ineligible coupon, or a database
    /// failure. Nothing is written on error.
    pub async fn place(
        &self,
        shopper: ShopperId,
        checkout: &ValidCheckout,
    ) -> Result<Order, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        let lines: Vec<PricedLine> = match checkout.buy_now {
            Some((product_id, quantity)) => {
                let product: Product = PRODUCTS
                    .select("*")
                    .eq("id", product_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or(CheckoutError::ProductNotFound)?;
                vec![PricedLine::buy_now(&product, quantity)]
            }
            None => {
                let cart: Vec<CartLine> = CART_LINES
                    .select("*")
                    .eq("shopper_id", shopper)
                    .order("created_at", Sort::Asc)
                    .fetch_all(&mut *tx)
                    .await?;
                cart.into_iter().map(PricedLine::from).collect()
            }
        };

        let coupon = match checkout.coupon_code.as_deref() {
            Some(code) => Some(
                sqlx::query_as::<_, Coupon>("SELECT * FROM coupons WHERE code = $1 FOR UPDATE")
                    .bind(code)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or(CheckoutError::UnknownCoupon)?,
            ),
            None => None,
        };

        let totals = price_order(&lines, coupon.as_ref(), Utc::now())?;

        let address = serde_json::to_value(&checkout.shipping_address).ok();
        let order: Order = ORDERS
            .insert()
            .set("shopper_id", shopper)
            .set("customer_email", checkout.customer_email.as_str())
            .set("customer_name", checkout.customer_name.as_deref())
            .set("status", OrderStatus::Pending)
            .set("subtotal_amount", totals.subtotal)
            .set("discount_amount", totals.discount)
            .set("total_amount", totals.total)
            .set("coupon_code", coupon.as_ref().map(|c| c.code.as_str()))
            .set("payment_method", checkout.payment_method.as_str())
            .set("shipping_address", address)
            .returning("*")
            .fetch_one(&mut *tx)
            .await?;

        for line in &lines {
            ORDER_ITEMS
                .insert()
                .set("order_id", order.id)
                .set("product_id", line.product_id)
                .set("quantity", line.quantity)
                .set("price", line.price)
                .execute(&mut *tx)
                .await?;
            PRODUCTS
                .update()
                .increment("sales_count", line.quantity)
                .eq("id", line.product_id)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(coupon) = &coupon {
            COUPONS
                .update()
                .increment("current_usage", 1)
                .eq("id", coupon.id)
                .execute(&mut *tx)
                .await?;
        }

        if checkout.buy_now.is_none() {
            CART_ITEMS
                .delete()
                .eq("shopper_id", shopper)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            total = %order.total_amount,
            items = lines.len(),
            "Order placed"
        );
        Ok(order)
    }

    /// The shopper's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, shopper: ShopperId) -> Result<Vec<Order>, RepositoryError> {
        let orders = ORDERS
            .select("*")
            .eq("shopper_id", shopper)
            .order("created_at", Sort::Desc)
            .limit(ORDER_HISTORY_LIMIT)
            .fetch_all(self.pool)
            .await?;
        Ok(orders)
    }

    /// One of the shopper's orders. Another shopper's order is not found.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shopper has no such order.
    pub async fn get(&self, shopper: ShopperId, id: OrderId) -> Result<Order, RepositoryError> {
        ORDERS
            .select("*")
            .eq("id", id)
            .eq("shopper_id", shopper)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

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
}
