//! Coupon repository.

use sqlx::PgPool;

use velora_core::table::{Order, Table};
use velora_core::{Coupon, CouponId, ListQuery, ValidCoupon};

use super::RepositoryError;

const COUPONS: Table = Table::new("coupons");

const DUPLICATE_CODE: &str = "A coupon with this code already exists";

/// Repository for coupon database operations.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Coupons matching `query`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Coupon>, RepositoryError> {
        let coupons: Vec<Coupon> = COUPONS
            .select("*")
            .order("created_at", Order::Desc)
            .fetch_all(self.pool)
            .await?;
        Ok(query.apply(coupons))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code is already taken.
    pub async fn create(&self, coupon: &ValidCoupon) -> Result<Coupon, RepositoryError> {
        COUPONS
            .insert()
            .set("code", coupon.code.as_str())
            .set("description", coupon.description.as_deref())
            .set("discount_type", coupon.discount_type)
            .set("discount_value", coupon.discount_value)
            .set("max_usage", coupon.max_usage)
            .set("min_purchase_amount", coupon.min_purchase_amount)
            .set("max_purchase_amount", coupon.max_purchase_amount)
            .set("valid_from", coupon.valid_from)
            .set("valid_until", coupon.valid_until)
            .set("is_active", coupon.is_active)
            .returning("*")
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::unique(e, DUPLICATE_CODE))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no coupon has this id, or
    /// `RepositoryError::Conflict` if the new code is already taken.
    pub async fn update(
        &self,
        id: CouponId,
        coupon: &ValidCoupon,
    ) -> Result<Coupon, RepositoryError> {
        COUPONS
            .update()
            .set("code", coupon.code.as_str())
            .set("description", coupon.description.as_deref())
            .set("discount_type", coupon.discount_type)
            .set("discount_value", coupon.discount_value)
            .set("max_usage", coupon.max_usage)
            .set("min_purchase_amount", coupon.min_purchase_amount)
            .set("max_purchase_amount", coupon.max_purchase_amount)
            .set("valid_from", coupon.valid_from)
            .set("valid_until", coupon.valid_until)
            .set("is_active", coupon.is_active)
            .eq("id", id)
            .returning("*")
            .fetch_optional(self.pool)
            .await
            .map_err(|e| RepositoryError::unique(e, DUPLICATE_CODE))?
            .ok_or(RepositoryError::NotFound)
    }

    /// Flip `is_active`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no coupon has this id.
    pub async fn toggle_active(&self, id: CouponId) -> Result<Coupon, RepositoryError> {
        COUPONS
            .update()
            .toggle("is_active")
            .eq("id", id)
            .returning("*")
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no coupon has this id.
    pub async fn delete(&self, id: CouponId) -> Result<(), RepositoryError> {
        let deleted = COUPONS.delete().eq("id", id).execute(self.pool).await?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
