//! Velora Admin library.
//!
//! The admin JSON API and the order-status email function, exposed as a
//! library so the binary, the CLI and the tests share one implementation.
//!
//! # Security
//!
//! Everything under `/api` requires the `ADMIN_API_TOKEN` bearer token.
//! `/functions/*` is open with wildcard CORS and only sends email.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
