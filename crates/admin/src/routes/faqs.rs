//! FAQ route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use velora_core::ordering::MoveDirection;
use velora_core::{Faq, FaqId, FaqInput, ListQuery};

use crate::db::FaqRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: MoveDirection,
}

#[instrument(skip(_auth, state))]
pub async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Faq>>, AppError> {
    Ok(Json(FaqRepository::new(state.pool()).list(&query).await?))
}

#[instrument(skip(_auth, state))]
pub async fn show(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<FaqId>,
) -> Result<Json<Faq>, AppError> {
    Ok(Json(FaqRepository::new(state.pool()).get(id).await?))
}

/// Add a FAQ at the end of the list.
#[instrument(skip(_auth, state, input))]
pub async fn create(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<FaqInput>,
) -> Result<(StatusCode, Json<Faq>), AppError> {
    let faq = input.validate()?;
    let created = FaqRepository::new(state.pool()).create(&faq).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(_auth, state, input))]
pub async fn update(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<FaqId>,
    Json(input): Json<FaqInput>,
) -> Result<Json<Faq>, AppError> {
    let faq = input.validate()?;
    Ok(Json(FaqRepository::new(state.pool()).update(id, &faq).await?))
}

#[instrument(skip(_auth, state))]
pub async fn toggle_active(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<FaqId>,
) -> Result<Json<Faq>, AppError> {
    Ok(Json(FaqRepository::new(state.pool()).toggle_active(id).await?))
}

/// Move one place up or down; returns the re-read list.
#[instrument(skip(_auth, state))]
pub async fn move_step(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<FaqId>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<Vec<Faq>>, AppError> {
    let repo = FaqRepository::new(state.pool());
    if !repo.move_step(id, request.direction).await? {
        tracing::debug!(%id, "FAQ already at the end of the list");
    }
    Ok(Json(repo.list(&ListQuery::default()).await?))
}

#[instrument(skip(_auth, state))]
pub async fn delete(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<FaqId>,
) -> Result<StatusCode, AppError> {
    FaqRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
