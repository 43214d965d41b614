//! Wishlist route handlers.
//!
//! Mutations return the stored id set so a client that toggled
//! optimistically can reconcile.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use velora_core::{ProductId, ShopperId};

use super::products::ProductView;
use crate::db::{CatalogRepository, WishlistRepository};
use crate::error::Result;
use crate::middleware::Shopper;
use crate::services::ShopperEvent;
use crate::state::AppState;

/// Body of the wishlist mutations.
#[derive(Debug, Deserialize)]
pub struct WishlistRequest {
    pub product_id: ProductId,
}

/// `GET /api/wishlist` response.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub product_ids: Vec<ProductId>,
    pub products: Vec<ProductView>,
}

/// Response to a wishlist mutation.
#[derive(Debug, Serialize)]
pub struct WishlistState {
    pub product_ids: Vec<ProductId>,
    /// Whether the requested product is in the wishlist now.
    pub in_wishlist: bool,
}

async fn state_after(
    state: &AppState,
    shopper: ShopperId,
    product_id: ProductId,
) -> Result<Json<WishlistState>> {
    let product_ids = WishlistRepository::new(state.pool())
        .product_ids(shopper)
        .await?;
    Ok(Json(WishlistState {
        in_wishlist: product_ids.contains(&product_id),
        product_ids,
    }))
}

async fn announce_added(state: &AppState, shopper: ShopperId, product_id: ProductId) -> Result<()> {
    let product = CatalogRepository::new(state.pool())
        .product(product_id)
        .await?;
    state.events().publish(
        shopper,
        ShopperEvent::ProductAddedToWishlist {
            product_id,
            name: product.name,
            image_url: product.image_url,
        },
    );
    Ok(())
}

/// `GET /api/wishlist`
#[instrument(skip(state))]
pub async fn index(
    Shopper(shopper): Shopper,
    State(state): State<AppState>,
) -> Result<Json<WishlistView>> {
    let settings = state.settings().get(state.pool()).await?;
    let products = WishlistRepository::new(state.pool())
        .products(shopper)
        .await?;
    Ok(Json(WishlistView {
        product_ids: products.iter().map(|p| p.id).collect(),
        products: ProductView::all(products, &settings.currency_symbol()),
    }))
}

/// `POST /api/wishlist/add`
#[instrument(skip(state))]
pub async fn add(
    Shopper(shopper): Shopper,
    State(state): State<AppState>,
    Json(request): Json<WishlistRequest>,
) -> Result<Json<WishlistState>> {
    let added = WishlistRepository::new(state.pool())
        .add(shopper, request.product_id)
        .await?;
    if added {
        announce_added(&state, shopper, request.product_id).await?;
    }
    state_after(&state, shopper, request.product_id).await
}

/// `POST /api/wishlist/remove`
#[instrument(skip(state))]
pub async fn remove(
    Shopper(shopper): Shopper,
    State(state): State<AppState>,
    Json(request): Json<WishlistRequest>,
) -> Result<Json<WishlistState>> {
    WishlistRepository::new(state.pool())
        .remove(shopper, request.product_id)
        .await?;
    state_after(&state, shopper, request.product_id).await
}

/// `POST /api/wishlist/toggle`
#[instrument(skip(state))]
pub async fn toggle(
    Shopper(shopper): Shopper,
    State(state): State<AppState>,
    Json(request): Json<WishlistRequest>,
) -> Result<Json<WishlistState>> {
    let now_in_wishlist = WishlistRepository::new(state.pool())
        .toggle(shopper, request.product_id)
        .await?;
    if now_in_wishlist {
        announce_added(&state, shopper, request.product_id).await?;
    }
    state_after(&state, shopper, request.product_id).await
}
