//! Orders, order items and checkout input.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{ValidationError, optional_text, require_text};
use crate::types::{Email, OrderId, OrderItemId, OrderStatus, Price, ProductId, ShopperId};

/// Payment method recorded when checkout does not name one.
pub const DEFAULT_PAYMENT_METHOD: &str = "cod";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Order {
    pub id: OrderId,
    pub shopper_id: ShopperId,
    pub customer_email: String,
    pub customer_name: Option<String>,
    #[cfg_attr(feature = "postgres", sqlx(try_from = "String"))]
    pub status: OrderStatus,
    pub subtotal_amount: Price,
    pub discount_amount: Price,
    pub total_amount: Price,
    pub coupon_code: Option<String>,
    pub payment_method: Option<String>,
    pub shipping_address: Option<serde_json::Value>,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// The stored shipping address, if present and well-formed.
    #[must_use]
    pub fn shipping_address(&self) -> Option<ShippingAddress> {
        self.shipping_address
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub quantity: i32,
    pub price: Price,
}

/// An order item with its product name (`order_item_lines` view).
///
/// Items whose product was deleted are named "Product".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub product_name: String,
    pub quantity: i32,
    pub price: Price,
}

impl OrderLine {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Sum of `price * quantity` over the lines.
#[must_use]
pub fn order_total(lines: &[OrderLine]) -> Price {
    lines.iter().map(OrderLine::line_total).sum()
}

/// Postal address stored as JSON on the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingAddress {
    pub full_name: String,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: Option<String>,
}

impl ShippingAddress {
    /// Printable lines: name, street lines, "city, state postal", phone.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(5);
        let mut push = |s: &str| {
            let s = s.trim();
            if !s.is_empty() {
                lines.push(s.to_owned());
            }
        };
        push(&self.full_name);
        push(&self.address_line_1);
        push(self.address_line_2.as_deref().unwrap_or_default());
        let locality = format!("{}, {} {}", self.city.trim(), self.state.trim(), self.postal_code.trim());
        push(locality.trim_matches(|c: char| c == ',' || c.is_whitespace()));
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            lines.push(format!("Phone: {}", phone.trim()));
        }
        lines
    }

    /// Check the fields a courier needs.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first blank required field.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            full_name: require_text(&self.full_name, "full_name", "Please enter your full name")?,
            address_line_1: require_text(
                &self.address_line_1,
                "address_line_1",
                "Please enter your address",
            )?,
            address_line_2: optional_text(self.address_line_2.as_deref()),
            city: require_text(&self.city, "city", "Please enter your city")?,
            state: require_text(&self.state, "state", "Please enter your state")?,
            postal_code: require_text(
                &self.postal_code,
                "postal_code",
                "Please enter your postal code",
            )?,
            phone: optional_text(self.phone.as_deref()),
        })
    }
}

/// Body of a checkout request.
///
/// Without `buy_now_product_id` the order is built from the shopper's cart;
/// with it, from that single product (the cart is left alone).
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutInput {
    pub customer_email: String,
    pub customer_name: Option<String>,
    pub shipping_address: ShippingAddress,
    pub payment_method: Option<String>,
    pub coupon_code: Option<String>,
    pub buy_now_product_id: Option<ProductId>,
    pub buy_now_quantity: Option<i32>,
}

/// A checkout request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCheckout {
    pub customer_email: Email,
    pub customer_name: Option<String>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub coupon_code: Option<String>,
    pub buy_now: Option<(ProductId, i32)>,
}

impl CheckoutInput {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an invalid email, an incomplete
    /// address or an out-of-range buy-now quantity.
    pub fn validate(self) -> Result<ValidCheckout, ValidationError> {
        let customer_email = Email::parse(&self.customer_email)
            .map_err(|e| ValidationError::new("customer_email", format!("Invalid email: {e}")))?;
        let shipping_address = self.shipping_address.validate()?;
        let buy_now = match self.buy_now_product_id {
            Some(product_id) => {
                let quantity =
                    super::catalog::validate_quantity(self.buy_now_quantity.unwrap_or(1), false)?;
                Some((product_id, quantity))
            }
            None => None,
        };

        Ok(ValidCheckout {
            customer_email,
            customer_name: optional_text(self.customer_name.as_deref())
                .or_else(|| Some(shipping_address.full_name.clone())),
            payment_method: optional_text(self.payment_method.as_deref())
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_owned()),
            coupon_code: optional_text(self.coupon_code.as_deref()).map(|c| c.to_uppercase()),
            shipping_address,
            buy_now,
        })
    }
}

/// Admin request to move an order to a new status.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<NaiveDate>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Meera Iyer".to_owned(),
            address_line_1: "12 MG Road".to_owned(),
            address_line_2: Some("  ".to_owned()),
            city: "Bengaluru".to_owned(),
            state: "Karnataka".to_owned(),
            postal_code: "560001".to_owned(),
            phone: Some("+91 98450 00000".to_owned()),
        }
    }

    #[test]
    fn test_order_total_sums_price_times_quantity() {
        let lines = [
            OrderLine {
                product_name: "Kurta".to_owned(),
                quantity: 2,
                price: Price::new(Decimal::new(1_299, 0)),
            },
            OrderLine {
                product_name: "Product".to_owned(),
                quantity: 3,
                price: Price::new(Decimal::new(9_950, 2)),
            },
        ];
        assert_eq!(order_total(&lines), Price::new(Decimal::new(289_650, 2)));
    }

    #[test]
    fn test_order_total_saturates_on_huge_lines() {
        let lines = [
            OrderLine {
                product_name: "Heirloom".to_owned(),
                quantity: 2,
                price: Price::new(Decimal::MAX),
            },
            OrderLine {
                product_name: "Kurta".to_owned(),
                quantity: 1,
                price: Price::new(Decimal::new(1_299, 0)),
            },
        ];
        assert_eq!(order_total(&lines), Price::new(Decimal::MAX));
    }

    #[test]
    fn test_address_lines_skip_blanks() {
        assert_eq!(
            address().lines(),
            vec![
                "Meera Iyer",
                "12 MG Road",
                "Bengaluru, Karnataka 560001",
                "Phone: +91 98450 00000",
            ]
        );
    }

    #[test]
    fn test_address_validate() {
        let valid = address().validate().unwrap();
        assert_eq!(valid.address_line_2, None);

        let mut missing = address();
        missing.city = " ".to_owned();
        assert_eq!(missing.validate().unwrap_err().field(), "city");
    }

    #[test]
    fn test_checkout_validate_defaults() {
        let input = CheckoutInput {
            customer_email: "meera@example.in".to_owned(),
            customer_name: None,
            shipping_address: address(),
            payment_method: None,
            coupon_code: Some(" diwali10 ".to_owned()),
            buy_now_product_id: None,
            buy_now_quantity: None,
        };
        let valid = input.validate().unwrap();
        assert_eq!(valid.payment_method, DEFAULT_PAYMENT_METHOD);
        assert_eq!(valid.coupon_code.as_deref(), Some("DIWALI10"));
        assert_eq!(valid.customer_name.as_deref(), Some("Meera Iyer"));
        assert!(valid.buy_now.is_none());
    }

    #[test]
    fn test_checkout_rejects_bad_email() {
        let input = CheckoutInput {
            customer_email: "meera".to_owned(),
            customer_name: None,
            shipping_address: address(),
            payment_method: None,
            coupon_code: None,
            buy_now_product_id: Some(ProductId::new()),
            buy_now_quantity: None,
        };
        assert_eq!(input.validate().unwrap_err().field(), "customer_email");
    }

    #[test]
    fn test_order_parses_stored_address() {
        let now = Utc::now();
        let order = Order {
            id: OrderId::new(),
            shopper_id: ShopperId::new(),
            customer_email: "meera@example.in".to_owned(),
            customer_name: None,
            status: OrderStatus::Pending,
            subtotal_amount: Price::ZERO,
            discount_amount: Price::ZERO,
            total_amount: Price::ZERO,
            coupon_code: None,
            payment_method: None,
            shipping_address: Some(serde_json::json!({"full_name": "Meera", "city": "Pune"})),
            tracking_number: None,
            estimated_delivery: None,
            created_at: now,
            updated_at: now,
        };
        let address = order.shipping_address().unwrap();
        assert_eq!(address.full_name, "Meera");
        assert_eq!(address.city, "Pune");
        assert!(address.address_line_1.is_empty());
    }
}
