//! Velora Storefront library.
//!
//! The public shopping API: catalog, cart, wishlist, checkout, order
//! history and published content. Exposed as a library so the binary and
//! the tests share one router.
//!
//! Shoppers are anonymous; a session cookie carries their id.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
