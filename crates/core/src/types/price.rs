//! Money amounts using decimal arithmetic.
//!
//! Prices are stored as `NUMERIC(12, 2)` and carried as [`Decimal`]. The
//! store sells in a single currency whose symbol comes from site settings,
//! so `Price` holds only the amount and formatting takes the symbol.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency symbol used when site settings do not provide one.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// A non-negative money amount in the store currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price multiplied by a line quantity, saturating at the decimal bounds.
    #[must_use]
    pub fn times(self, quantity: i32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Round half away from zero to whole cents.
    #[must_use]
    pub fn round_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Subtract without going below zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        if other.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - other.0)
        }
    }

    /// Format with digit grouping and at most two decimals, e.g. `1,234.5`.
    ///
    /// ```rust
    /// # use velora_core::Price;
    /// # use rust_decimal::Decimal;
    /// assert_eq!(Price::new(Decimal::new(123_450, 2)).grouped(), "1,234.5");
    /// assert_eq!(Price::new(Decimal::new(500, 0)).grouped(), "500");
    /// ```
    #[must_use]
    pub fn grouped(&self) -> String {
        let rounded = self.round_cents().0.normalize();
        let text = rounded.abs().to_string();
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + 4);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        if !fraction.is_empty() {
            grouped.push('.');
            grouped.push_str(fraction);
        }
        if rounded.is_sign_negative() && !rounded.is_zero() {
            grouped.insert(0, '-');
        }
        grouped
    }

    /// Format with a currency symbol prefix, e.g. `₹1,234.5`.
    #[must_use]
    pub fn display_with(&self, symbol: &str) -> String {
        format!("{symbol}{}", self.grouped())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.grouped())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<Decimal> for Price {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self {
        Self(self.0.saturating_mul(rhs))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        Ok(Self(<Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(cents: i64) -> Price {
        Price::new(Decimal::new(cents, 2))
    }

    #[test]
    fn test_grouped_formatting() {
        assert_eq!(price(0).grouped(), "0");
        assert_eq!(price(99_900).grouped(), "999");
        assert_eq!(price(100_000).grouped(), "1,000");
        assert_eq!(price(1_234_567_89).grouped(), "1,234,567.89");
        assert_eq!(price(1_050).grouped(), "10.5");
    }

    #[test]
    fn test_grouped_rounds_to_cents() {
        let p = Price::new(Decimal::new(10_005, 3));
        assert_eq!(p.grouped(), "10.01");
    }

    #[test]
    fn test_display_with_symbol() {
        assert_eq!(price(249_900).display_with("₹"), "₹2,499");
        assert_eq!(price(1_999).display_with("$"), "$19.99");
    }

    #[test]
    fn test_line_totals_sum() {
        let total: Price = [price(50_000).times(2), price(25_050).times(1)]
            .into_iter()
            .sum();
        assert_eq!(total, price(125_050));
    }

    #[test]
    fn test_saturating_sub() {
        assert_eq!(price(1_000).saturating_sub(price(2_500)), Price::ZERO);
        assert_eq!(price(2_500).saturating_sub(price(1_000)), price(1_500));
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_overflowing() {
        let max = Price::new(Decimal::MAX);
        assert_eq!(max.times(2), max);
        assert_eq!(max.times(-2), Price::new(Decimal::MIN));
        assert_eq!(max + price(1), max);
        assert_eq!([max, max, price(100)].into_iter().sum::<Price>(), max);
    }
}
