//! Shopper order history.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use velora_core::{Order, OrderId, OrderLine};

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::Shopper;
use crate::state::AppState;

/// An order with its items.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLine>,
}

/// `GET /api/orders`
#[instrument(skip(state))]
pub async fn index(
    Shopper(shopper): Shopper,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list(shopper).await?;
    Ok(Json(orders))
}

/// `GET /api/orders/{id}`; another shopper's order is a 404.
#[instrument(skip(state))]
pub async fn show(
    Shopper(shopper): Shopper,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDetail>> {
    let orders = OrderRepository::new(state.pool());
    let order = orders.get(shopper, id).await?;
    let items = orders.lines(order.id).await?;
    Ok(Json(OrderDetail { order, items }))
}
