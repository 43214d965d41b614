//! Hero carousel image route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use velora_core::{HeroImage, HeroImageId, HeroImageInput};

use crate::db::HeroImageRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Move the image at position `from` to position `to` (0-based).
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[instrument(skip(_auth, state))]
pub async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<HeroImage>>, AppError> {
    Ok(Json(HeroImageRepository::new(state.pool()).list().await?))
}

/// Append an image after the current last one.
#[instrument(skip(_auth, state, input))]
pub async fn create(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<HeroImageInput>,
) -> Result<(StatusCode, Json<HeroImage>), AppError> {
    let input = input.validate()?;
    let image = HeroImageRepository::new(state.pool()).add(&input).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

#[instrument(skip(_auth, state))]
pub async fn toggle_active(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<HeroImageId>,
) -> Result<Json<HeroImage>, AppError> {
    Ok(Json(
        HeroImageRepository::new(state.pool())
            .toggle_active(id)
            .await?,
    ))
}

#[instrument(skip(_auth, state))]
pub async fn reorder(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<Vec<HeroImage>>, AppError> {
    let images = HeroImageRepository::new(state.pool())
        .reorder(request.from, request.to)
        .await?;
    Ok(Json(images))
}

#[instrument(skip(_auth, state))]
pub async fn delete(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<HeroImageId>,
) -> Result<StatusCode, AppError> {
    HeroImageRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
