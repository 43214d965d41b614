//! Status enums for orders, coupons and system logs.
//!
//! These are stored as constrained `TEXT` columns, so each enum converts to
//! and from its lowercase string form (`as_str` / `FromStr`) and the row
//! models decode them through `TryFrom<String>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a status string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The lowercase database and wire representation.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(UnknownVariant {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnknownVariant;

            fn try_from(value: String) -> Result<Self, UnknownVariant> {
                value.parse()
            }
        }
    };
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

string_enum!(OrderStatus, "order status", {
    Pending => "pending",
    Confirmed => "confirmed",
    Processing => "processing",
    Shipped => "shipped",
    Delivered => "delivered",
    Cancelled => "cancelled",
});

/// Colour used for statuses without a dedicated one.
pub const DEFAULT_STATUS_COLOR: &str = "#2196F3";

/// Message used for statuses without a dedicated one.
pub const DEFAULT_STATUS_MESSAGE: &str = "Your order status has been updated.";

/// The customer-facing message and accent colour for a status change email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusNotice {
    pub message: &'static str,
    pub color: &'static str,
}

impl StatusNotice {
    /// Notice for an arbitrary status string.
    ///
    /// Unknown statuses (and the ones without a dedicated notice) get the
    /// generic message with the default colour.
    ///
    /// ```rust
    /// # use velora_core::StatusNotice;
    /// assert_eq!(StatusNotice::for_status("delivered").color, "#4CAF50");
    /// assert_eq!(StatusNotice::for_status("on-hold").color, "#2196F3");
    /// ```
    #[must_use]
    pub fn for_status(status: &str) -> Self {
        status
            .parse::<OrderStatus>()
            .map_or(Self::GENERIC, |s| s.notice())
    }

    const GENERIC: Self = Self {
        message: DEFAULT_STATUS_MESSAGE,
        color: DEFAULT_STATUS_COLOR,
    };
}

impl OrderStatus {
    /// The message and colour shown in the status-change email.
    #[must_use]
    pub const fn notice(&self) -> StatusNotice {
        match self {
            Self::Confirmed => StatusNotice {
                message: "Your order has been confirmed and is being prepared for shipment.",
                color: "#FF9800",
            },
            Self::Shipped => StatusNotice {
                message: "Your order has been shipped! You can track your package using the tracking number below.",
                color: "#2196F3",
            },
            Self::Delivered => StatusNotice {
                message: "Your order has been delivered! We hope you enjoy your purchase.",
                color: "#4CAF50",
            },
            Self::Cancelled => StatusNotice {
                message: "Your order has been cancelled. If you have any questions, please contact us.",
                color: "#F44336",
            },
            Self::Pending | Self::Processing => StatusNotice::GENERIC,
        }
    }
}

/// Capitalize the first character of a status for display ("shipped" -> "Shipped").
#[must_use]
pub fn display_status(status: &str) -> String {
    let mut chars = status.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// How a coupon reduces the order subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    #[default]
    Percentage,
    Fixed,
}

string_enum!(DiscountType, "discount type", {
    Percentage => "percentage",
    Fixed => "fixed",
});

/// Severity of a system log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Critical,
}

string_enum!(LogLevel, "log level", {
    Info => "info",
    Warning => "warning",
    Error => "error",
    Critical => "critical",
});
