//! Velora Core - shared domain types and data access.
//!
//! This crate provides the types used across all Velora components:
//! - `storefront` - Public shopping API (catalog, cart, wishlist, checkout)
//! - `admin` - Admin API and order-status notifications
//! - `cli` - Command-line tools for migrations, seeding and resends
//!
//! # Architecture
//!
//! Types, validation and pure helpers carry no I/O. The one exception is
//! [`table`], the table-scoped query builder, which is only compiled with
//! the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails and statuses
//! - [`models`] - Row structs and validated write inputs
//! - [`filters`] - Search/category/status filtering for admin lists
//! - [`ordering`] - `display_order` helpers
//! - [`table`] - Generic select/insert/update/delete builder (`postgres`)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod filters;
pub mod models;
pub mod ordering;
#[cfg(feature = "postgres")]
pub mod table;
pub mod types;

pub use filters::{ListQuery, Listable};
pub use models::*;
pub use types::*;
