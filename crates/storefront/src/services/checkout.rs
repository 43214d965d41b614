//! Order pricing.
//!
//! Turns the lines being bought and an optional coupon into the three
//! amounts stored on an order. No I/O; the order repository calls this
//! inside the checkout transaction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use velora_core::{CartLine, Coupon, CouponRejection, Price, Product, ProductId};

use crate::db::RepositoryError;

/// Why a checkout was refused.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Product not found")]
    ProductNotFound,

    #[error("{0} is out of stock")]
    OutOfStock(String),

    #[error("Invalid coupon code")]
    UnknownCoupon,

    #[error("{0}")]
    Coupon(#[from] CouponRejection),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// One product being bought, with the price captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: i32,
    pub in_stock: bool,
}

impl PricedLine {
    /// A single "buy now" line.
    #[must_use]
    pub fn buy_now(product: &Product, quantity: i32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity,
            in_stock: product.in_stock,
        }
    }

    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

impl From<CartLine> for PricedLine {
    fn from(line: CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name,
            price: line.price,
            quantity: line.quantity,
            in_stock: line.in_stock,
        }
    }
}

/// Amounts stored on the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub subtotal: Price,
    pub discount: Price,
    pub total: Price,
}

/// Price `lines`, applying `coupon` when given.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` for no lines, `OutOfStock` naming the
/// first unavailable product, or the coupon's rejection.
pub fn price_order(
    lines: &[PricedLine],
    coupon: Option<&Coupon>,
    now: DateTime<Utc>,
) -> Result<OrderTotals, CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if let Some(line) = lines.iter().find(|l| !l.in_stock) {
        return Err(CheckoutError::OutOfStock(line.name.clone()));
    }

    let subtotal: Price = lines.iter().map(PricedLine::line_total).sum();
    let discount = match coupon {
        Some(coupon) => coupon.apply(subtotal, now)?,
        None => Price::ZERO,
    };

    Ok(OrderTotals {
        subtotal,
        discount,
        total: subtotal.saturating_sub(discount),
    })
}
