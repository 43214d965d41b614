//! Catalog repository: categories, products and hero images.

use serde::Deserialize;
use sqlx::PgPool;

use velora_core::table::{Order, Table};
use velora_core::{Category, CategoryId, HeroImage, Product, ProductId};

use super::RepositoryError;

const CATEGORIES: Table = Table::new("categories");
const PRODUCTS: Table = Table::new("products");
const HERO_IMAGES: Table = Table::new("hero_carousel_images");

const PRODUCT_SEARCH_COLUMNS: &[&str] = &["name", "description"];

/// Products shown in the home page "top sellers" strip.
pub const TOP_PRODUCT_LIMIT: i64 = 10;

/// Default and maximum page size for product listings.
pub const DEFAULT_PRODUCT_LIMIT: i64 = 50;
pub const MAX_PRODUCT_LIMIT: i64 = 200;

/// Query parameters for `GET /api/products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<CategoryId>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

impl ProductFilter {
    /// Requested limit clamped to `1..=MAX_PRODUCT_LIMIT`.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PRODUCT_LIMIT)
            .clamp(1, MAX_PRODUCT_LIMIT)
    }
}

/// Read-only access to the catalog.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = CATEGORIES
            .select("*")
            .order("name", Order::Asc)
            .fetch_all(self.pool)
            .await?;
        Ok(categories)
    }

    /// Products matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut select = PRODUCTS.select("*");
        if let Some(category) = filter.category {
            select = select.eq("category_id", category);
        }
        if let Some(search) = filter.search.as_deref() {
            select = select.search(PRODUCT_SEARCH_COLUMNS, search);
        }
        let products = select
            .order("created_at", Order::Desc)
            .limit(filter.limit())
            .fetch_all(self.pool)
            .await?;
        Ok(products)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    pub async fn product(&self, id: ProductId) -> Result<Product, RepositoryError> {
        PRODUCTS
            .select("*")
            .eq("id", id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Best-selling in-stock products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = PRODUCTS
            .select("*")
            .eq("in_stock", true)
            .order("sales_count", Order::Desc)
            .order("created_at", Order::Desc)
            .limit(TOP_PRODUCT_LIMIT)
            .fetch_all(self.pool)
            .await?;
        Ok(products)
    }

    /// Active carousel images by display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn hero_images(&self) -> Result<Vec<HeroImage>, RepositoryError> {
        let images = HERO_IMAGES
            .select("*")
            .eq("is_active", true)
            .order("display_order", Order::Asc)
            .fetch_all(self.pool)
            .await?;
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_limit_clamped() {
        let mut filter = ProductFilter::default();
        assert_eq!(filter.limit(), DEFAULT_PRODUCT_LIMIT);

        filter.limit = Some(0);
        assert_eq!(filter.limit(), 1);

        filter.limit = Some(10_000);
        assert_eq!(filter.limit(), MAX_PRODUCT_LIMIT);
    }
}
