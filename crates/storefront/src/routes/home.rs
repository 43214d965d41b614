//! Home page data.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use velora_core::{Category, HeroImage, ThemeColors};

use super::products::ProductView;
use crate::db::CatalogRepository;
use crate::error::Result;
use crate::state::AppState;

/// Everything the home page renders.
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub site_name: String,
    pub currency_symbol: String,
    pub theme: ThemeColors,
    pub categories: Vec<Category>,
    pub top_products: Vec<ProductView>,
    pub hero_images: Vec<HeroImage>,
}

/// `GET /api/home`
///
/// Settings, categories, best sellers and carousel images are independent
/// reads, run concurrently.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<Json<HomePage>> {
    let catalog = CatalogRepository::new(state.pool());

    let (settings, categories, top_products, hero_images) = tokio::try_join!(
        state.settings().get(state.pool()),
        catalog.categories(),
        catalog.top_products(),
        catalog.hero_images(),
    )?;

    let currency_symbol = settings.currency_symbol();
    Ok(Json(HomePage {
        site_name: settings.site_name(),
        theme: settings.theme(),
        top_products: ProductView::all(top_products, &currency_symbol),
        currency_symbol,
        categories,
        hero_images,
    }))
}
