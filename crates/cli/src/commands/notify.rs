//! Resend an order-status email.
//!
//! Uses the same notifier as `POST /api/orders/{id}/status`, so the email
//! content, SMTP settings and failure logging are identical. The stored
//! order status is not changed.

use velora_admin::db::{OrderRepository, RepositoryError};
use velora_admin::services::{OrderNotifier, PgNotificationStore, SmtpMailer, StatusEmailRequest};
use velora_core::{Order, OrderId, OrderStatus};

/// Build the notification request for `order` announcing `status`.
fn status_request(order: &Order, status: OrderStatus) -> StatusEmailRequest {
    StatusEmailRequest {
        order_id: Some(order.id.to_string()),
        new_status: Some(status.as_str().to_owned()),
        tracking_number: order.tracking_number.clone(),
        estimated_delivery: order.estimated_delivery.map(|d| d.to_string()),
        customer_email: Some(order.customer_email.clone()),
        customer_name: order.customer_name.clone(),
        ..StatusEmailRequest::default()
    }
}

/// Send the status email for `order_id`.
///
/// # Errors
///
/// Returns an error if the order does not exist, settings cannot be read,
/// SMTP is not configured or the send fails.
pub async fn run(order_id: OrderId, status: OrderStatus) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let order = match OrderRepository::new(&pool).get(order_id).await {
        Ok(order) => order,
        Err(RepositoryError::NotFound) => return Err(format!("Order not found: {order_id}").into()),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(order_id = %order.id, status = %status, to = %order.customer_email, "Sending status email");

    let notifier = OrderNotifier::new(PgNotificationStore::new(pool), SmtpMailer);
    notifier.notify(&status_request(&order, status)).await?;

    tracing::info!("Email sent!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use velora_core::{Price, ShopperId};

    use super::*;

    fn order() -> Order {
        Order {
            id: OrderId::new(),
            shopper_id: ShopperId::new(),
            customer_email: "meera@example.in".to_owned(),
            customer_name: Some("Meera Iyer".to_owned()),
            status: OrderStatus::Processing,
            subtotal_amount: Price::ZERO,
            discount_amount: Price::ZERO,
            total_amount: Price::ZERO,
            coupon_code: None,
            payment_method: Some("cod".to_owned()),
            shipping_address: None,
            tracking_number: Some("TRK123".to_owned()),
            estimated_delivery: NaiveDate::from_ymd_opt(2026, 3, 14),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_request_announces_given_status() {
        let order = order();
        let request = status_request(&order, OrderStatus::Shipped);
        assert_eq!(
            request.required(),
            Some((order.id.to_string().as_str(), "shipped", "meera@example.in"))
        );
        assert_eq!(request.tracking_number.as_deref(), Some("TRK123"));
        assert_eq!(request.estimated_delivery.as_deref(), Some("2026-03-14"));
        assert!(request.order_items.is_none());
    }
}
