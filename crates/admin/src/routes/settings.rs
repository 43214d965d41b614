//! Site settings route handlers.
//!
//! SMTP settings are edited here rather than in the environment.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use velora_core::SiteSettings;

use crate::db::SettingsRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SettingValue {
    pub value: serde_json::Value,
}

/// Every setting, with secrets redacted.
#[instrument(skip(_auth, state))]
pub async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<SiteSettings>, AppError> {
    let settings = SettingsRepository::new(state.pool()).load_all().await?;
    Ok(Json(settings.redacted()))
}

/// Insert or replace one setting; returns the redacted settings.
#[instrument(skip(_auth, state, body))]
pub async fn upsert(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<SettingValue>,
) -> Result<Json<SiteSettings>, AppError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::BadRequest("Setting key is required".to_owned()));
    }

    let repo = SettingsRepository::new(state.pool());
    repo.upsert(key, &body.value).await?;
    tracing::info!(key, "Site setting updated");

    Ok(Json(repo.load_all().await?.redacted()))
}
