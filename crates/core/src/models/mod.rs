//! Row models and write inputs for every table.
//!
//! Row structs derive `sqlx::FromRow` under the `postgres` feature. Write
//! inputs (`*Input`) carry a `validate()` that performs the non-empty and
//! range checks the admin screens need before any database call.

pub mod catalog;
pub mod content;
pub mod coupons;
pub mod logs;
pub mod orders;
pub mod settings;

pub use catalog::*;
pub use content::*;
pub use coupons::*;
pub use logs::*;
pub use orders::*;
pub use settings::*;

/// A write input failed a pre-database check.
///
/// The message is user-facing and returned verbatim by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// The input field that failed.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Trim a required text field, failing with `message` when blank.
///
/// # Errors
///
/// Returns a [`ValidationError`] for `field` if the trimmed value is empty.
pub fn require_text(
    value: &str,
    field: &'static str,
    message: &str,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, message));
    }
    Ok(trimmed.to_owned())
}

/// Trim an optional text field, mapping blank to `None`.
#[must_use]
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

pub(crate) const fn default_true() -> bool {
    true
}
