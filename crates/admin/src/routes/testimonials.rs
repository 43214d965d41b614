//! Testimonial route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use velora_core::{ListQuery, Testimonial, TestimonialId, TestimonialInput};

use crate::db::TestimonialRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

#[instrument(skip(_auth, state))]
pub async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Testimonial>>, AppError> {
    Ok(Json(TestimonialRepository::new(state.pool()).list(&query).await?))
}

#[instrument(skip(_auth, state, input))]
pub async fn create(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<TestimonialInput>,
) -> Result<(StatusCode, Json<Testimonial>), AppError> {
    let testimonial = input.validate()?;
    let created = TestimonialRepository::new(state.pool())
        .create(&testimonial)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(_auth, state, input))]
pub async fn update(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<TestimonialId>,
    Json(input): Json<TestimonialInput>,
) -> Result<Json<Testimonial>, AppError> {
    let testimonial = input.validate()?;
    Ok(Json(
        TestimonialRepository::new(state.pool())
            .update(id, &testimonial)
            .await?,
    ))
}

#[instrument(skip(_auth, state))]
pub async fn toggle_approved(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<TestimonialId>,
) -> Result<Json<Testimonial>, AppError> {
    Ok(Json(
        TestimonialRepository::new(state.pool())
            .toggle_approved(id)
            .await?,
    ))
}

#[instrument(skip(_auth, state))]
pub async fn toggle_featured(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<TestimonialId>,
) -> Result<Json<Testimonial>, AppError> {
    Ok(Json(
        TestimonialRepository::new(state.pool())
            .toggle_featured(id)
            .await?,
    ))
}

#[instrument(skip(_auth, state))]
pub async fn delete(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<TestimonialId>,
) -> Result<StatusCode, AppError> {
    TestimonialRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
