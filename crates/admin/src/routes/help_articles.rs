//! Help article route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use velora_core::{HelpArticle, HelpArticleId, HelpArticleInput, ListQuery};

use crate::db::HelpArticleRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

#[instrument(skip(_auth, state))]
pub async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<HelpArticle>>, AppError> {
    Ok(Json(HelpArticleRepository::new(state.pool()).list(&query).await?))
}

#[instrument(skip(_auth, state))]
pub async fn show(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<HelpArticleId>,
) -> Result<Json<HelpArticle>, AppError> {
    Ok(Json(HelpArticleRepository::new(state.pool()).get(id).await?))
}

#[instrument(skip(_auth, state, input))]
pub async fn create(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<HelpArticleInput>,
) -> Result<(StatusCode, Json<HelpArticle>), AppError> {
    let article = input.validate()?;
    let created = HelpArticleRepository::new(state.pool()).create(&article).await?;
    tracing::info!(slug = %created.slug, "Help article created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(_auth, state, input))]
pub async fn update(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<HelpArticleId>,
    Json(input): Json<HelpArticleInput>,
) -> Result<Json<HelpArticle>, AppError> {
    let article = input.validate()?;
    Ok(Json(
        HelpArticleRepository::new(state.pool())
            .update(id, &article)
            .await?,
    ))
}

#[instrument(skip(_auth, state))]
pub async fn toggle_published(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<HelpArticleId>,
) -> Result<Json<HelpArticle>, AppError> {
    Ok(Json(
        HelpArticleRepository::new(state.pool())
            .toggle_published(id)
            .await?,
    ))
}

#[instrument(skip(_auth, state))]
pub async fn delete(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<HelpArticleId>,
) -> Result<StatusCode, AppError> {
    HelpArticleRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
