//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;

use velora_core::{Category, Product, ProductId};

use crate::db::{CatalogRepository, ProductFilter};
use crate::error::Result;
use crate::state::AppState;

/// A product with its sale badge and display price.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub discount_percent: Option<u32>,
    pub price_display: String,
    pub original_price_display: Option<String>,
}

impl ProductView {
    #[must_use]
    pub fn new(product: Product, currency_symbol: &str) -> Self {
        Self {
            discount_percent: product.discount_percent(),
            price_display: product.price.display_with(currency_symbol),
            original_price_display: product
                .original_price
                .filter(|_| product.discount_percent().is_some())
                .map(|p| p.display_with(currency_symbol)),
            product,
        }
    }

    /// Views for a list of products.
    #[must_use]
    pub fn all(products: Vec<Product>, currency_symbol: &str) -> Vec<Self> {
        products
            .into_iter()
            .map(|p| Self::new(p, currency_symbol))
            .collect()
    }
}

/// `GET /api/categories`
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = CatalogRepository::new(state.pool()).categories().await?;
    Ok(Json(categories))
}

/// `GET /api/products?category&search&limit`
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<ProductView>>> {
    let settings = state.settings().get(state.pool()).await?;
    let products = CatalogRepository::new(state.pool())
        .products(&filter)
        .await?;
    Ok(Json(ProductView::all(products, &settings.currency_symbol())))
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let settings = state.settings().get(state.pool()).await?;
    let product = CatalogRepository::new(state.pool()).product(id).await?;
    Ok(Json(ProductView::new(product, &settings.currency_symbol())))
}
