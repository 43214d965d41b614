//! Unified error handling for storefront.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use velora_core::ValidationError;

use crate::db::RepositoryError;
use crate::services::CheckoutError;

/// Application-level error type for the storefront API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Request input failed its pre-database checks.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Checkout was refused.
    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),
}

/// Result type alias for storefront handlers.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound)
            | Self::Checkout(
                CheckoutError::ProductNotFound | CheckoutError::Repository(RepositoryError::NotFound),
            )
            | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Database(_))
            | Self::Checkout(CheckoutError::Repository(RepositoryError::Database(_))) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Validation(_) | Self::Checkout(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront request error"
            );
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_owned()
        } else if status == StatusCode::NOT_FOUND {
            match &self {
                Self::NotFound(what) => format!("{what} not found"),
                Self::Checkout(CheckoutError::ProductNotFound) => self.to_string(),
                _ => "Not found".to_owned(),
            }
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
