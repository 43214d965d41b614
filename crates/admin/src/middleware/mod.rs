//! HTTP middleware for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (`x-request-id`)
//! 4. CORS on `/functions` only
//!
//! Authentication is an extractor, not a layer: see [`RequireAdminAuth`].

pub mod auth;
pub mod request_id;

pub use auth::{AdminAuthRejection, RequireAdminAuth};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
