//! Function-style endpoints callable from the browser.
//!
//! `POST /functions/send-order-status-email` takes the camelCase body the
//! storefront and admin screens already send and answers with
//! `{success, message}` or `{error, warning?}`.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderName, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::instrument;

use crate::services::{DELIVERY_WARNING, NotifyError, StatusEmailRequest};
use crate::state::AppState;

pub const STATUS_EMAIL_SENT: &str = "Status update email sent successfully";

/// Wildcard CORS for the function routes.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

fn error_response(status: StatusCode, body: serde_json::Value) -> Response {
    (status, Json(body)).into_response()
}

/// A body that is not the expected JSON is reported as a server error
/// carrying the parser's message.
fn body_rejected(rejection: &JsonRejection) -> Response {
    tracing::warn!(error = %rejection.body_text(), "Unreadable status email request");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Internal server error", "details": rejection.body_text() }),
    )
}

/// Send the order-status email described by the body.
#[instrument(skip_all)]
pub async fn send_order_status_email(
    State(state): State<AppState>,
    body: Result<Json<StatusEmailRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return body_rejected(&rejection),
    };

    match state.notifier().notify(&request).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": STATUS_EMAIL_SENT })),
        )
            .into_response(),
        Err(err @ (NotifyError::MissingFields | NotifyError::InvalidAmounts)) => {
            error_response(StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
        }
        Err(err @ NotifyError::Settings(_)) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": err.to_string() }),
        ),
        Err(err @ NotifyError::Delivery(_)) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": err.to_string(), "warning": DELIVERY_WARNING }),
        ),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use axum::body::{Body, to_bytes};
    use axum::extract::{FromRequest, Request};

    use super::*;

    #[tokio::test]
    async fn test_malformed_body_is_internal_error_with_details() {
        let request = Request::builder()
            .method(Method::POST)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"orderId\": "))
            .unwrap();
        let rejection = Json::<StatusEmailRequest>::from_request(request, &())
            .await
            .unwrap_err();

        let response = body_rejected(&rejection);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal server error");
        assert!(!body["details"].as_str().unwrap().is_empty());
    }
}
