//! Coupon management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use velora_core::{Coupon, CouponId, CouponInput, ListQuery};

use crate::db::CouponRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// List coupons, newest first, filtered by `search` and `status`.
#[instrument(skip(_auth, state))]
pub async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Coupon>>, AppError> {
    let coupons = CouponRepository::new(state.pool()).list(&query).await?;
    Ok(Json(coupons))
}

/// Create a coupon. The code is uppercased.
#[instrument(skip(_auth, state, input))]
pub async fn create(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<CouponInput>,
) -> Result<(StatusCode, Json<Coupon>), AppError> {
    let coupon = input.validate()?;
    let created = CouponRepository::new(state.pool()).create(&coupon).await?;
    tracing::info!(code = %created.code, "Coupon created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(_auth, state, input))]
pub async fn update(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<CouponId>,
    Json(input): Json<CouponInput>,
) -> Result<Json<Coupon>, AppError> {
    let coupon = input.validate()?;
    let updated = CouponRepository::new(state.pool()).update(id, &coupon).await?;
    Ok(Json(updated))
}

#[instrument(skip(_auth, state))]
pub async fn toggle_active(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<CouponId>,
) -> Result<Json<Coupon>, AppError> {
    let coupon = CouponRepository::new(state.pool()).toggle_active(id).await?;
    Ok(Json(coupon))
}

#[instrument(skip(_auth, state))]
pub async fn delete(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<CouponId>,
) -> Result<StatusCode, AppError> {
    CouponRepository::new(state.pool()).delete(id).await?;
    tracing::info!(%id, "Coupon deleted");
    Ok(StatusCode::NO_CONTENT)
}
