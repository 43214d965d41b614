//! Discount coupons.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ValidationError, default_true, optional_text, require_text};
use crate::types::{CouponId, DiscountType, Price};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    pub description: Option<String>,
    #[cfg_attr(feature = "postgres", sqlx(try_from = "String"))]
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub max_usage: Option<i32>,
    pub current_usage: i32,
    pub min_purchase_amount: Price,
    pub max_purchase_amount: Option<Price>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub applicable_to: String,
    pub created_at: DateTime<Utc>,
}

/// Why a coupon cannot be applied to an order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CouponRejection {
    #[error("This coupon is not active")]
    Inactive,
    #[error("This coupon is not valid yet")]
    NotStarted,
    #[error("This coupon has expired")]
    Expired,
    #[error("This coupon has reached its usage limit")]
    UsageExhausted,
    #[error("Minimum purchase of {0} required for this coupon")]
    BelowMinimum(Price),
    #[error("This coupon applies to orders up to {0} only")]
    AboveMaximum(Price),
}

impl Coupon {
    /// `valid_until` has passed.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.valid_until.is_some_and(|until| until < now)
    }

    /// `current_usage` has reached `max_usage`.
    #[must_use]
    pub fn usage_exhausted(&self) -> bool {
        self.max_usage.is_some_and(|max| self.current_usage >= max)
    }

    /// Discount amount for a subtotal, ignoring eligibility.
    ///
    /// Percentage discounts are rounded to cents; neither kind exceeds the
    /// subtotal.
    #[must_use]
    pub fn discount_for(&self, subtotal: Price) -> Price {
        let discount = match self.discount_type {
            DiscountType::Percentage => {
                (subtotal * (self.discount_value / Decimal::ONE_HUNDRED)).round_cents()
            }
            DiscountType::Fixed => Price::new(self.discount_value),
        };
        discount.min(subtotal)
    }

    /// Check eligibility and compute the discount.
    ///
    /// # Errors
    ///
    /// Returns the first [`CouponRejection`] that applies.
    pub fn apply(&self, subtotal: Price, now: DateTime<Utc>) -> Result<Price, CouponRejection> {
        if !self.is_active {
            return Err(CouponRejection::Inactive);
        }
        if self.valid_from.is_some_and(|from| from > now) {
            return Err(CouponRejection::NotStarted);
        }
        if self.is_expired(now) {
            return Err(CouponRejection::Expired);
        }
        if self.usage_exhausted() {
            return Err(CouponRejection::UsageExhausted);
        }
        if subtotal < self.min_purchase_amount {
            return Err(CouponRejection::BelowMinimum(self.min_purchase_amount));
        }
        if let Some(max) = self.max_purchase_amount
            && subtotal > max
        {
            return Err(CouponRejection::AboveMaximum(max));
        }
        Ok(self.discount_for(subtotal))
    }
}

/// Create/update body for a coupon.
#[derive(Debug, Clone, Deserialize)]
pub struct CouponInput {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub max_usage: Option<i32>,
    pub min_purchase_amount: Option<Decimal>,
    pub max_purchase_amount: Option<Decimal>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A coupon input ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCoupon {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub max_usage: Option<i32>,
    pub min_purchase_amount: Decimal,
    pub max_purchase_amount: Option<Decimal>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl CouponInput {
    /// Trim and uppercase the code and normalize the optional limits.
    ///
    /// A zero `max_usage` or `max_purchase_amount` means "no limit".
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a blank code, a non-positive
    /// discount, a percentage above 100, negative limits, or a validity
    /// window that ends before it starts.
    pub fn validate(self) -> Result<ValidCoupon, ValidationError> {
        let code = require_text(&self.code, "code", "Please enter a coupon code")?.to_uppercase();
        if self.discount_value <= Decimal::ZERO {
            return Err(ValidationError::new(
                "discount_value",
                "Discount value must be greater than 0",
            ));
        }
        if self.discount_type == DiscountType::Percentage
            && self.discount_value > Decimal::ONE_HUNDRED
        {
            return Err(ValidationError::new(
                "discount_value",
                "Percentage discount cannot exceed 100",
            ));
        }
        if self.max_usage.is_some_and(|m| m < 0) {
            return Err(ValidationError::new(
                "max_usage",
                "Usage limit cannot be negative",
            ));
        }
        let min_purchase_amount = self.min_purchase_amount.unwrap_or(Decimal::ZERO);
        if min_purchase_amount < Decimal::ZERO {
            return Err(ValidationError::new(
                "min_purchase_amount",
                "Minimum purchase cannot be negative",
            ));
        }
        let max_purchase_amount = self.max_purchase_amount.filter(|m| *m > Decimal::ZERO);
        if max_purchase_amount.is_some_and(|max| max < min_purchase_amount) {
            return Err(ValidationError::new(
                "max_purchase_amount",
                "Maximum purchase must be at least the minimum purchase",
            ));
        }
        if let (Some(from), Some(until)) = (self.valid_from, self.valid_until)
            && until < from
        {
            return Err(ValidationError::new(
                "valid_until",
                "Coupon must end after it starts",
            ));
        }

        Ok(ValidCoupon {
            code,
            description: optional_text(self.description.as_deref()),
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            max_usage: self.max_usage.filter(|m| *m > 0),
            min_purchase_amount,
            max_purchase_amount,
            valid_from: self.valid_from,
            valid_until: self.valid_until,
            is_active: self.is_active,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn input(code: &str, value: i64) -> CouponInput {
        CouponInput {
            code: code.to_owned(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::new(value, 0),
            max_usage: Some(0),
            min_purchase_amount: None,
            max_purchase_amount: Some(Decimal::ZERO),
            valid_from: None,
            valid_until: None,
            is_active: true,
        }
    }

    fn coupon(discount_type: DiscountType, value: Decimal) -> Coupon {
        Coupon {
            id: CouponId::new(),
            code: "FESTIVE".to_owned(),
            description: None,
            discount_type,
            discount_value: value,
            max_usage: None,
            current_usage: 0,
            min_purchase_amount: Price::ZERO,
            max_purchase_amount: None,
            valid_from: None,
            valid_until: None,
            is_active: true,
            applicable_to: "all".to_owned(),
            created_at: Utc::now(),
        }
    }

    fn rupees(n: i64) -> Price {
        Price::new(Decimal::new(n, 0))
    }

    #[test]
    fn test_blank_code_rejected() {
        let err = input("   ", 10).validate().unwrap_err();
        assert_eq!(err.field(), "code");
        assert_eq!(err.to_string(), "Please enter a coupon code");
    }

    #[test]
    fn test_non_positive_discount_rejected() {
        let err = input("SAVE", 0).validate().unwrap_err();
        assert_eq!(err.to_string(), "Discount value must be greater than 0");
        assert!(input("SAVE", 101).validate().is_err());
    }

    #[test]
    fn test_validate_normalizes() {
        let valid = input(" save10 ", 10).validate().unwrap();
        assert_eq!(valid.code, "SAVE10");
        assert_eq!(valid.max_usage, None);
        assert_eq!(valid.max_purchase_amount, None);
        assert_eq!(valid.min_purchase_amount, Decimal::ZERO);
    }

    #[test]
    fn test_expiry_and_usage() {
        let now = Utc::now();
        let mut c = coupon(DiscountType::Fixed, Decimal::new(100, 0));
        assert!(!c.is_expired(now));
        c.valid_until = Some(now - Duration::hours(1));
        assert!(c.is_expired(now));
        assert_eq!(c.apply(rupees(500), now), Err(CouponRejection::Expired));

        c.valid_until = None;
        c.max_usage = Some(3);
        c.current_usage = 3;
        assert!(c.usage_exhausted());
        assert_eq!(
            c.apply(rupees(500), now),
            Err(CouponRejection::UsageExhausted)
        );
    }

    #[test]
    fn test_discount_amounts() {
        let pct = coupon(DiscountType::Percentage, Decimal::new(15, 0));
        assert_eq!(
            pct.discount_for(Price::new(Decimal::new(99_999, 2))),
            Price::new(Decimal::new(15_000, 2))
        );

        let fixed = coupon(DiscountType::Fixed, Decimal::new(300, 0));
        assert_eq!(fixed.discount_for(rupees(1000)), rupees(300));
        assert_eq!(fixed.discount_for(rupees(200)), rupees(200));
    }

    #[test]
    fn test_purchase_bounds() {
        let now = Utc::now();
        let mut c = coupon(DiscountType::Fixed, Decimal::new(50, 0));
        c.min_purchase_amount = rupees(500);
        c.max_purchase_amount = Some(rupees(5000));
        assert_eq!(
            c.apply(rupees(499), now),
            Err(CouponRejection::BelowMinimum(rupees(500)))
        );
        assert_eq!(
            c.apply(rupees(5001), now),
            Err(CouponRejection::AboveMaximum(rupees(5000)))
        );
        assert_eq!(c.apply(rupees(500), now), Ok(rupees(50)));

        c.is_active = false;
        assert_eq!(c.apply(rupees(500), now), Err(CouponRejection::Inactive));
    }
}
