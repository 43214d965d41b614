//! Anonymous shopper identity.
//!
//! Shoppers do not sign in. The first request that needs an identity mints a
//! [`ShopperId`] and stores it in the session; later requests with the same
//! cookie get the same id back.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use velora_core::ShopperId;

/// Session key holding the shopper id.
pub const SHOPPER_ID_KEY: &str = "shopper_id";

/// Extractor for the current shopper, created on first use.
///
/// ```rust,ignore
/// async fn cart(Shopper(shopper): Shopper, State(state): State<AppState>) -> ... {
///     CartRepository::new(state.pool()).lines(shopper).await
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Shopper(pub ShopperId);

/// The session layer is missing or the session store failed.
#[derive(Debug, thiserror::Error)]
pub enum ShopperRejection {
    #[error("session layer not installed")]
    MissingSession,
    #[error("session store error: {0}")]
    Store(#[from] tower_sessions::session::Error),
}

impl IntoResponse for ShopperRejection {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Failed to resolve shopper session");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Session unavailable" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for Shopper
where
    S: Send + Sync,
{
    type Rejection = ShopperRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(ShopperRejection::MissingSession)?;

        if let Some(shopper) = session.get::<ShopperId>(SHOPPER_ID_KEY).await? {
            return Ok(Self(shopper));
        }

        let shopper = ShopperId::new();
        session.insert(SHOPPER_ID_KEY, shopper).await?;
        tracing::debug!(%shopper, "New shopper session");
        Ok(Self(shopper))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, header},
        routing::get,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    use super::*;
    use crate::middleware::session::SESSION_COOKIE_NAME;

    async fn whoami(Shopper(shopper): Shopper) -> String {
        shopper.to_string()
    }

    fn app() -> Router {
        Router::new().route("/whoami", get(whoami)).layer(
            SessionManagerLayer::new(MemoryStore::default())
                .with_name(SESSION_COOKIE_NAME)
                .with_secure(false),
        )
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_shopper_id_persists_across_requests() {
        let app = app();

        let response = app
            .clone()
            .oneshot(Request::get("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_owned();
        assert!(cookie.starts_with(SESSION_COOKIE_NAME));
        let first = body_text(response).await;
        assert!(first.parse::<ShopperId>().is_ok());

        let response = app
            .oneshot(
                Request::get("/whoami")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_text(response).await, first);
    }

    #[tokio::test]
    async fn test_new_visitors_get_distinct_ids() {
        let app = app();
        let mut ids = Vec::new();
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(Request::get("/whoami").body(Body::empty()).unwrap())
                .await
                .unwrap();
            ids.push(body_text(response).await);
        }
        assert_ne!(ids.first(), ids.get(1));
    }

    #[tokio::test]
    async fn test_missing_session_layer_is_500() {
        let app = Router::new().route("/whoami", get(whoami));
        let response = app
            .oneshot(Request::get("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
