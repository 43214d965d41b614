//! Catalog, cart and wishlist rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::types::{CartItemId, CategoryId, Price, ProductId, ShopperId, WishlistItemId};

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: i32 = 99;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub original_price: Option<Price>,
    pub image_url: Option<String>,
    pub rating: Decimal,
    pub sales_count: i32,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whole-percent markdown from `original_price`, if the product is on sale.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?.amount();
        let price = self.price.amount();
        if original <= price || original.is_zero() {
            return None;
        }
        ((original - price) / original * Decimal::ONE_HUNDRED)
            .round()
            .to_u32()
    }
}

/// A cart row joined with its product (`cart_lines` view).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CartLine {
    pub cart_item_id: CartItemId,
    pub shopper_id: ShopperId,
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: Option<String>,
    pub in_stock: bool,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Sum of line totals.
#[must_use]
pub fn cart_subtotal(lines: &[CartLine]) -> Price {
    lines.iter().map(CartLine::line_total).sum()
}

/// Total number of units across cart lines (the header badge count).
#[must_use]
pub fn cart_unit_count(lines: &[CartLine]) -> i64 {
    lines.iter().map(|l| i64::from(l.quantity)).sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub shopper_id: ShopperId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
}

/// Check a requested line quantity.
///
/// `allow_zero` is set for updates, where zero removes the line.
///
/// # Errors
///
/// Returns a [`ValidationError`] if the quantity is negative, zero when not
/// allowed, or above [`MAX_LINE_QUANTITY`].
pub fn validate_quantity(quantity: i32, allow_zero: bool) -> Result<i32, ValidationError> {
    let min = i32::from(!allow_zero);
    if quantity < min {
        return Err(ValidationError::new(
            "quantity",
            format!("Quantity must be at least {min}"),
        ));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::new(
            "quantity",
            format!("Quantity cannot exceed {MAX_LINE_QUANTITY}"),
        ));
    }
    Ok(quantity)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(cents: i64, quantity: i32) -> CartLine {
        CartLine {
            cart_item_id: CartItemId::new(),
            shopper_id: ShopperId::new(),
            product_id: ProductId::new(),
            name: "Brass Diya".to_owned(),
            price: Price::new(Decimal::new(cents, 2)),
            image_url: None,
            in_stock: true,
            quantity,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_cart_totals() {
        let lines = [line(49_900, 2), line(12_050, 1)];
        assert_eq!(cart_subtotal(&lines), Price::new(Decimal::new(111_850, 2)));
        assert_eq!(cart_unit_count(&lines), 3);
        assert_eq!(cart_subtotal(&[]), Price::ZERO);
    }

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(1, false).unwrap(), 1);
        assert!(validate_quantity(0, false).is_err());
        assert_eq!(validate_quantity(0, true).unwrap(), 0);
        assert!(validate_quantity(-1, true).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1, false).is_err());
    }

    #[test]
    fn test_discount_percent() {
        let mut product = Product {
            id: ProductId::new(),
            category_id: None,
            name: "Silk Stole".to_owned(),
            description: None,
            price: Price::new(Decimal::new(750, 0)),
            original_price: Some(Price::new(Decimal::new(1000, 0))),
            image_url: None,
            rating: Decimal::new(45, 1),
            sales_count: 12,
            in_stock: true,
            created_at: Utc::now(),
        };
        assert_eq!(product.discount_percent(), Some(25));

        product.original_price = Some(Price::new(Decimal::new(700, 0)));
        assert_eq!(product.discount_percent(), None);

        product.original_price = None;
        assert_eq!(product.discount_percent(), None);
    }
}
