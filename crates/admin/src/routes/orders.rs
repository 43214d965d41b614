//! Order route handlers.
//!
//! A status change is saved first and the customer email sent second; a
//! failed send does not roll the status back.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use velora_core::{Order, OrderId, OrderLine, OrderStatus, StatusUpdate};

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::services::{DELIVERY_WARNING, NotifyError, StatusEmailRequest};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<String>,
}

impl OrderFilter {
    /// The status to filter on; blank or `all` means none.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown status.
    fn status(&self) -> Result<Option<OrderStatus>, AppError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("" | "all") => Ok(None),
            Some(s) => s
                .parse()
                .map(Some)
                .map_err(|_| AppError::BadRequest(format!("Unknown order status: {s}"))),
        }
    }
}

/// An order with its items.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLine>,
}

#[instrument(skip(_auth, state))]
pub async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<Order>>, AppError> {
    let status = filter.status()?;
    Ok(Json(
        OrderRepository::new(state.pool()).list_recent(status).await?,
    ))
}

#[instrument(skip(_auth, state))]
pub async fn show(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDetail>, AppError> {
    let repo = OrderRepository::new(state.pool());
    let order = repo.get(id).await?;
    let items = repo.lines(id).await?;
    Ok(Json(OrderDetail { order, items }))
}

/// Change status, tracking number and delivery date, then email the
/// customer.
#[instrument(skip(_auth, state, update), fields(status = %update.status))]
pub async fn update_status(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(update): Json<StatusUpdate>,
) -> Result<Response, AppError> {
    let order = OrderRepository::new(state.pool())
        .update_status(id, &update)
        .await?;
    tracing::info!(order_id = %id, status = %order.status, "Order status updated");

    let request = StatusEmailRequest {
        order_id: Some(order.id.to_string()),
        new_status: Some(order.status.as_str().to_owned()),
        tracking_number: order.tracking_number.clone(),
        estimated_delivery: order.estimated_delivery.map(|d| d.to_string()),
        customer_email: Some(order.customer_email.clone()),
        customer_name: order.customer_name.clone(),
        ..StatusEmailRequest::default()
    };

    match state.notifier().notify(&request).await {
        Ok(()) => Ok(Json(json!({ "order": order, "email_sent": true })).into_response()),
        Err(err @ (NotifyError::MissingFields | NotifyError::InvalidAmounts)) => {
            Err(AppError::BadRequest(err.to_string()))
        }
        Err(err) => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": err.to_string(),
                "warning": DELIVERY_WARNING,
                "order": order,
            })),
        )
            .into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(status: Option<&str>) -> OrderFilter {
        OrderFilter {
            status: status.map(str::to_owned),
        }
    }

    #[test]
    fn test_status_filter() {
        assert_eq!(filter(None).status().ok().flatten(), None);
        assert_eq!(filter(Some("all")).status().ok().flatten(), None);
        assert_eq!(
            filter(Some("shipped")).status().ok().flatten(),
            Some(OrderStatus::Shipped)
        );
        assert!(filter(Some("lost")).status().is_err());
    }
}
