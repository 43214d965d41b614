//! Core types for Velora.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{DEFAULT_CURRENCY_SYMBOL, Price};
pub use status::*;
