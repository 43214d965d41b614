//! Business logic services for storefront.
//!
//! # Services
//!
//! - `checkout` - Order pricing and checkout errors
//! - `events` - Per-shopper cart/wishlist notifications
//! - `settings_cache` - Site settings held for a TTL

pub mod checkout;
pub mod events;
pub mod settings_cache;

pub use checkout::{CheckoutError, OrderTotals, PricedLine, price_order};
pub use events::{EventBus, ShopperEvent};
pub use settings_cache::SettingsCache;
