//! Cart route handlers.
//!
//! Every mutation answers with the full cart as stored, so the client
//! replaces its copy instead of patching it.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use velora_core::{
    CartLine, Price, ProductId, ShopperId, cart_subtotal, cart_unit_count, validate_quantity,
};

use crate::db::{CartRepository, CatalogRepository};
use crate::error::{AppError, Result};
use crate::middleware::Shopper;
use crate::services::ShopperEvent;
use crate::state::AppState;

const fn default_quantity() -> i32 {
    1
}

/// Body of `POST /api/cart/add` and `POST /api/cart/update`.
#[derive(Debug, Deserialize)]
pub struct CartLineRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

/// Body of `POST /api/cart/remove`.
#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub product_id: ProductId,
}

#[derive(Debug, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub line: CartLine,
    pub line_total: Price,
}

/// The shopper's cart with totals.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: Price,
    pub item_count: i64,
}

impl From<Vec<CartLine>> for CartView {
    fn from(lines: Vec<CartLine>) -> Self {
        let subtotal = cart_subtotal(&lines);
        let item_count = cart_unit_count(&lines);
        Self {
            items: lines
                .into_iter()
                .map(|line| CartLineView {
                    line_total: line.line_total(),
                    line,
                })
                .collect(),
            subtotal,
            item_count,
        }
    }
}

async fn current_cart(state: &AppState, shopper: ShopperId) -> Result<Json<CartView>> {
    let lines = CartRepository::new(state.pool()).lines(shopper).await?;
    Ok(Json(CartView::from(lines)))
}

/// `GET /api/cart`
#[instrument(skip(state))]
pub async fn index(Shopper(shopper): Shopper, State(state): State<AppState>) -> Result<Json<CartView>> {
    current_cart(&state, shopper).await
}

/// `GET /api/cart/count`
#[instrument(skip(state))]
pub async fn count(Shopper(shopper): Shopper, State(state): State<AppState>) -> Result<Json<Value>> {
    let lines = CartRepository::new(state.pool()).lines(shopper).await?;
    Ok(Json(json!({ "count": cart_unit_count(&lines) })))
}

/// `POST /api/cart/add`
#[instrument(skip(state))]
pub async fn add(
    Shopper(shopper): Shopper,
    State(state): State<AppState>,
    Json(request): Json<CartLineRequest>,
) -> Result<Json<CartView>> {
    let quantity = validate_quantity(request.quantity, false)?;

    let product = CatalogRepository::new(state.pool())
        .product(request.product_id)
        .await?;
    if !product.in_stock {
        return Err(AppError::BadRequest(format!(
            "{} is out of stock",
            product.name
        )));
    }

    CartRepository::new(state.pool())
        .add(shopper, product.id, quantity)
        .await?;
    tracing::info!(%shopper, product_id = %product.id, quantity, "Added to cart");

    state.events().publish(
        shopper,
        ShopperEvent::ProductAddedToCart {
            product_id: product.id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
        },
    );

    current_cart(&state, shopper).await
}

/// `POST /api/cart/update`; quantity 0 removes the line.
#[instrument(skip(state))]
pub async fn update(
    Shopper(shopper): Shopper,
    State(state): State<AppState>,
    Json(request): Json<CartLineRequest>,
) -> Result<Json<CartView>> {
    let quantity = validate_quantity(request.quantity, true)?;
    CartRepository::new(state.pool())
        .set_quantity(shopper, request.product_id, quantity)
        .await?;
    current_cart(&state, shopper).await
}

/// `POST /api/cart/remove`
#[instrument(skip(state))]
pub async fn remove(
    Shopper(shopper): Shopper,
    State(state): State<AppState>,
    Json(request): Json<RemoveRequest>,
) -> Result<Json<CartView>> {
    CartRepository::new(state.pool())
        .remove(shopper, request.product_id)
        .await?;
    current_cart(&state, shopper).await
}
