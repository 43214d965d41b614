//! Checkout and coupon preview.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use velora_core::{CheckoutInput, Price, ValidationError, cart_subtotal, require_text};

use super::orders::OrderDetail;
use crate::db::{CartRepository, CouponRepository, OrderRepository};
use crate::error::Result;
use crate::middleware::Shopper;
use crate::services::CheckoutError;
use crate::state::AppState;

/// `POST /api/checkout`
///
/// Places a `pending` order from the cart, or from `buy_now_product_id`.
#[instrument(skip(state, input), fields(buy_now = input.buy_now_product_id.is_some()))]
pub async fn checkout(
    Shopper(shopper): Shopper,
    State(state): State<AppState>,
    Json(input): Json<CheckoutInput>,
) -> Result<(StatusCode, Json<OrderDetail>)> {
    let checkout = input.validate()?;

    let orders = OrderRepository::new(state.pool());
    let order = orders.place(shopper, &checkout).await?;
    let items = orders.lines(order.id).await?;

    Ok((StatusCode::CREATED, Json(OrderDetail { order, items })))
}

/// Body of `POST /api/coupons/validate`.
#[derive(Debug, Deserialize)]
pub struct CouponCheckRequest {
    pub code: String,
    /// Subtotal to price against; the shopper's cart when omitted.
    pub subtotal: Option<Decimal>,
}

/// What the coupon would take off.
#[derive(Debug, Serialize)]
pub struct CouponPreview {
    pub code: String,
    pub description: Option<String>,
    pub subtotal: Price,
    pub discount_amount: Price,
    pub total: Price,
}

/// `POST /api/coupons/validate`
#[instrument(skip(state))]
pub async fn validate_coupon(
    Shopper(shopper): Shopper,
    State(state): State<AppState>,
    Json(request): Json<CouponCheckRequest>,
) -> Result<Json<CouponPreview>> {
    let code = require_text(&request.code, "code", "Please enter a coupon code")?;
    let subtotal = match request.subtotal {
        Some(amount) if amount.is_sign_negative() => {
            return Err(ValidationError::new("subtotal", "Subtotal cannot be negative").into());
        }
        Some(amount) => Price::new(amount),
        None => cart_subtotal(&CartRepository::new(state.pool()).lines(shopper).await?),
    };

    let coupon = CouponRepository::new(state.pool())
        .find_by_code(&code)
        .await?
        .ok_or(CheckoutError::UnknownCoupon)?;
    let discount = coupon
        .apply(subtotal, Utc::now())
        .map_err(CheckoutError::from)?;

    Ok(Json(CouponPreview {
        code: coupon.code,
        description: coupon.description,
        subtotal,
        discount_amount: discount,
        total: subtotal.saturating_sub(discount),
    }))
}
