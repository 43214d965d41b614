//! System log route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::instrument;

use velora_core::{
    ListQuery, LogStats, NewSystemLog, SystemLog, SystemLogId, log_categories, logs_csv_filename,
    logs_to_csv,
};

use crate::db::SystemLogRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Filtered logs plus the stats and category list of the unfiltered view.
#[derive(Debug, Serialize)]
pub struct LogListing {
    pub logs: Vec<SystemLog>,
    pub stats: LogStats,
    pub categories: Vec<String>,
}

#[instrument(skip(_auth, state))]
pub async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<LogListing>, AppError> {
    let recent = SystemLogRepository::new(state.pool()).recent().await?;
    let stats = LogStats::from_logs(&recent);
    let categories = log_categories(&recent);
    Ok(Json(LogListing {
        logs: query.apply(recent),
        stats,
        categories,
    }))
}

#[instrument(skip(_auth, state, input))]
pub async fn create(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<NewSystemLog>,
) -> Result<(StatusCode, Json<SystemLog>), AppError> {
    let log = input.validate()?;
    let created = SystemLogRepository::new(state.pool()).create(&log).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(_auth, state))]
pub async fn delete(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<SystemLogId>,
) -> Result<StatusCode, AppError> {
    SystemLogRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete every log entry.
#[instrument(skip(_auth, state))]
pub async fn clear(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = SystemLogRepository::new(state.pool()).clear().await?;
    tracing::info!(deleted, "System logs cleared");
    Ok(Json(json!({ "deleted": deleted })))
}

/// Download the filtered logs as CSV.
#[instrument(skip(_auth, state))]
pub async fn export_csv(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let logs = SystemLogRepository::new(state.pool()).list(&query).await?;
    let csv = logs_to_csv(&logs);
    let filename = logs_csv_filename(Utc::now());

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", "text/csv".to_owned()),
            (
                "Content-Disposition",
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}
