//! Newtype IDs for type-safe entity references.
//!
//! Every table keys its rows by UUID. `define_id!` wraps the UUID so a
//! coupon id can never be passed where a FAQ id is expected.

/// Macro to define a type-safe UUID wrapper.
///
/// Creates a newtype wrapper around [`uuid::Uuid`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - `new()` (random v4), `from_uuid()`, `as_uuid()`, `FromStr`
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use velora_core::define_id;
/// define_id!(BannerId);
/// define_id!(VoucherId);
///
/// let banner = BannerId::new();
/// let voucher = VoucherId::from_uuid(banner.as_uuid());
///
/// // Same UUID, different types:
/// // let _: BannerId = voucher;
/// assert_eq!(banner.as_uuid(), voucher.as_uuid());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Generate a new random ID.
            #[must_use]
            pub fn new() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                ::uuid::Uuid::parse_str(s).map(Self)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <::uuid::Uuid as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <::uuid::Uuid as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <::uuid::Uuid as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <::uuid::Uuid as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Catalog
define_id!(CategoryId);
define_id!(ProductId);

// Shopper state
define_id!(ShopperId);
define_id!(CartItemId);
define_id!(WishlistItemId);

// Orders
define_id!(OrderId);
define_id!(OrderItemId);
define_id!(CouponId);

// Admin-managed content
define_id!(FaqId);
define_id!(HelpArticleId);
define_id!(TestimonialId);
define_id!(HeroImageId);
define_id!(SystemLogId);

impl OrderId {
    /// Short customer-facing reference: the last 8 characters of the id,
    /// uppercased.
    ///
    /// ```rust
    /// # use velora_core::OrderId;
    /// let id: OrderId = "6f1c2a4e-90b3-4d1e-8c55-0a1b2c3d4e5f".parse().unwrap();
    /// assert_eq!(id.short_ref(), "2C3D4E5F");
    /// ```
    #[must_use]
    pub fn short_ref(&self) -> String {
        short_ref(&self.0.to_string())
    }
}

/// Uppercased last 8 characters of an order id string.
///
/// Ids shorter than 8 characters are used whole.
#[must_use]
pub fn short_ref(order_id: &str) -> String {
    let chars: Vec<char> = order_id.chars().collect();
    let start = chars.len().saturating_sub(8);
    chars
        .get(start..)
        .unwrap_or_default()
        .iter()
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_short_ref_uses_last_eight_uppercased() {
        assert_eq!(short_ref("order-abcdef12"), "ABCDEF12");
        assert_eq!(
            short_ref("a3b9c7d1-0000-4000-8000-00000000beef"),
            "0000BEEF"
        );
    }

    #[test]
    fn test_short_ref_short_input() {
        assert_eq!(short_ref("ab12"), "AB12");
        assert_eq!(short_ref(""), "");
    }

    #[test]
    fn test_ids_parse_and_display() {
        let raw = "a3b9c7d1-0000-4000-8000-00000000beef";
        let id: FaqId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
        assert!("not-a-uuid".parse::<FaqId>().is_err());
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id = CouponId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}
