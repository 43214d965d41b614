//! The order-status email flow, end to end through the admin library with
//! in-memory store and transport. No servers or database needed.

#![allow(clippy::unwrap_used)]

use serde_json::{Value, json};

use velora_admin::services::order_notifications::OrderSnapshot;
use velora_admin::services::{NotifyError, OrderNotifier, StatusEmailRequest};
use velora_core::{LogLevel, OrderLine, Price, ShippingAddress, SiteSettings};
use velora_integration_tests::{RecordingTransport, StaticStore};

const ORDER_ID: &str = "5c1d9e2a-8b7f-4a6e-9d3c-2b1a0f9e8d7c";

fn settings(extra: &[(&str, Value)]) -> SiteSettings {
    let base = [
        ("site_name", json!("Velora Tradings")),
        ("currency_symbol", json!("₹")),
        ("smtp_host", json!("smtp.velora.in")),
        ("smtp_port", json!("587")),
        ("smtp_user", json!("orders@velora.in")),
        ("smtp_password", json!("app-password")),
        ("smtp_from_email", json!("orders@velora.in")),
    ];
    base.iter()
        .chain(extra)
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

/// The body the admin panel posts to `/functions/send-order-status-email`.
fn function_body(items: Value) -> StatusEmailRequest {
    serde_json::from_value(json!({
        "orderId": ORDER_ID,
        "newStatus": "shipped",
        "trackingNumber": "DL1234567890",
        "estimatedDelivery": "2026-03-15",
        "customerEmail": "meera@example.in",
        "customerName": "Meera",
        "orderItems": items,
        "paymentMethod": "upi",
    }))
    .unwrap()
}

#[tokio::test]
async fn test_supplied_items_are_rendered_in_both_bodies() {
    let store = StaticStore::new(settings(&[]));
    let transport = RecordingTransport::default();
    let notifier = OrderNotifier::new(&store, &transport);

    let request = function_body(json!([
        { "product_name": "Brass Diya", "quantity": 2, "price": "1250.50" },
        { "name": "Cotton Dupatta", "quantity": 1, "price": "899" },
    ]));
    notifier.notify(&request).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let email = &sent[0];
    assert_eq!(email.to, "meera@example.in");
    assert_eq!(email.subject, "Order Status Update: Shipped");

    for body in [&email.text_body, &email.html_body] {
        assert!(body.contains("#0F9E8D7C"), "short order ref missing");
        assert!(body.contains("Brass Diya"));
        assert!(body.contains("₹2,501"));
        assert!(body.contains("₹3,400"), "total is the sum of line totals");
        assert!(body.contains("DL1234567890"));
        assert!(body.contains("15 March 2026"));
    }
    assert!(email.text_body.contains("Hi Meera,"));
    assert!(email.text_body.contains("Payment Method: UPI"));
}

#[tokio::test]
async fn test_stored_order_fills_in_missing_items() {
    let mut store = StaticStore::new(settings(&[("currency_symbol", json!("$"))]));
    store.snapshot = Some(OrderSnapshot {
        lines: vec![OrderLine {
            product_name: "Walnut Tray".to_owned(),
            quantity: 3,
            price: Price::new(rust_decimal::Decimal::new(1999, 2)),
        }],
        shipping_address: Some(ShippingAddress {
            full_name: "Meera Iyer".to_owned(),
            address_line_1: "12 MG Road".to_owned(),
            address_line_2: None,
            city: "Bengaluru".to_owned(),
            state: "Karnataka".to_owned(),
            postal_code: "560001".to_owned(),
            phone: None,
        }),
        payment_method: Some("cod".to_owned()),
    });
    let transport = RecordingTransport::default();
    let notifier = OrderNotifier::new(&store, &transport);

    let mut request = function_body(Value::Null);
    request.payment_method = None;
    notifier.notify(&request).await.unwrap();

    let email = transport.sent().pop().unwrap();
    assert!(email.text_body.contains("Walnut Tray x 3 @ $19.99 = $59.97"));
    assert!(email.text_body.contains("Total Amount: $59.97"));
    assert!(email.text_body.contains("Bengaluru, Karnataka 560001"));
    assert!(email.text_body.contains("Payment Method: COD"));
}

#[tokio::test]
async fn test_delivery_failure_is_logged_once() {
    let store = StaticStore::new(settings(&[]));
    let transport = RecordingTransport::failing();
    let notifier = OrderNotifier::new(&store, &transport);

    let err = notifier
        .notify(&function_body(json!([])))
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::Delivery(_)));
    assert!(err.to_string().contains("smtp.velora.in"));

    let failures = store.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].level, LogLevel::Error);
    assert_eq!(failures[0].category, "email");
}

#[tokio::test]
async fn test_missing_smtp_settings() {
    let store = StaticStore::new(
        [("site_name", json!("Velora Tradings"))]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect(),
    );
    let transport = RecordingTransport::default();
    let notifier = OrderNotifier::new(&store, &transport);

    let err = notifier
        .notify(&function_body(json!([])))
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::Delivery(_)));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_blank_required_field() {
    let store = StaticStore::new(settings(&[]));
    let transport = RecordingTransport::default();
    let notifier = OrderNotifier::new(&store, &transport);
    let mut request = function_body(json!([]));
    request.customer_email = Some("   ".to_owned());

    let err = notifier.notify(&request).await.unwrap_err();
    assert_eq!(err.to_string(), "Missing required fields");
    assert!(store.failures().is_empty());
    assert!(transport.sent().is_empty());
}
