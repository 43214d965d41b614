//! Coupon lookup.

use sqlx::PgPool;

use velora_core::Coupon;
use velora_core::table::Table;

use super::RepositoryError;

const COUPONS: Table = Table::new("coupons");

/// Read access to coupons by code.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Coupon by code. Codes are stored uppercased.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        let coupon = COUPONS
            .select("*")
            .eq("code", code.trim().to_uppercase())
            .fetch_optional(self.pool)
            .await?;
        Ok(coupon)
    }
}
