//! HTTP tests for the admin API and the order-status function.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The admin server running (cargo run -p velora-admin)
//! - `ADMIN_API_TOKEN` set to the token the server was started with
//!
//! Run with: cargo test -p velora-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use velora_integration_tests::{admin_client, admin_url, unique};

fn url(path: &str) -> String {
    format!("{}{path}", admin_url())
}

async fn create_coupon(client: &Client, code: &str) -> reqwest::Response {
    client
        .post(url("/api/coupons"))
        .json(&json!({
            "code": code,
            "description": "Integration test coupon",
            "discount_type": "percentage",
            "discount_value": "10",
            "max_usage": 0,
        }))
        .send()
        .await
        .expect("Failed to reach admin")
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_api_requires_token() {
    let resp = Client::new()
        .get(url("/api/coupons"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires running admin server and ADMIN_API_TOKEN"]
async fn test_coupon_lifecycle() {
    let client = admin_client().unwrap();
    let code = unique("it-");

    let resp = create_coupon(&client, &code).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let coupon: Value = resp.json().await.unwrap();
    assert_eq!(coupon["code"], json!(code.to_uppercase()));
    assert_eq!(coupon["max_usage"], Value::Null);
    let id = coupon["id"].as_str().unwrap().to_owned();

    // Codes are unique regardless of case.
    let resp = create_coupon(&client, &code.to_uppercase()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let toggled: Value = client
        .post(url(&format!("/api/coupons/{id}/toggle")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled["is_active"], json!(false));

    let listed: Value = client
        .get(url(&format!("/api/coupons?search={code}&status=inactive")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let resp = client
        .delete(url(&format!("/api/coupons/{id}")))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
}

#[tokio::test]
#[ignore = "Requires running admin server and ADMIN_API_TOKEN"]
async fn test_coupon_validation() {
    let client = admin_client().unwrap();
    let resp = client
        .post(url("/api/coupons"))
        .json(&json!({
            "code": unique("zero-"),
            "discount_type": "fixed",
            "discount_value": "0",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server and ADMIN_API_TOKEN"]
async fn test_faq_moves_stay_in_bounds() {
    let client = admin_client().unwrap();
    let category = unique("it-faq-");
    let mut ids = Vec::new();
    for question in ["First?", "Second?"] {
        let faq: Value = client
            .post(url("/api/faqs"))
            .json(&json!({
                "question": question,
                "answer": "Yes.",
                "category": category,
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        ids.push(faq["id"].as_str().unwrap().to_owned());
    }

    let resp = client
        .post(url(&format!("/api/faqs/{}/move", ids[1])))
        .json(&json!({ "direction": "up" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let listed: Value = client
        .get(url(&format!("/api/faqs?category={category}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let order: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["question"].as_str().unwrap())
        .collect();
    assert_eq!(order, ["Second?", "First?"]);

    for id in ids {
        client
            .delete(url(&format!("/api/faqs/{id}")))
            .send()
            .await
            .unwrap();
    }
}

#[tokio::test]
#[ignore = "Requires running admin server and ADMIN_API_TOKEN"]
async fn test_faq_toggle_round_trips() {
    let client = admin_client().unwrap();
    let faq: Value = client
        .post(url("/api/faqs"))
        .json(&json!({
            "question": "Do you ship abroad?",
            "answer": "Not yet.",
            "category": unique("it-faq-"),
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = faq["id"].as_str().unwrap().to_owned();
    let was_active = faq["is_active"].as_bool().unwrap();

    let resp = client
        .post(url(&format!("/api/faqs/{id}/toggle")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let fetched: Value = client
        .get(url(&format!("/api/faqs/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["is_active"].as_bool(), Some(!was_active));

    client
        .delete(url(&format!("/api/faqs/{id}")))
        .send()
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "Requires running admin server and ADMIN_API_TOKEN"]
async fn test_log_export_is_csv() {
    let client = admin_client().unwrap();
    let message = format!("Quoted \"{}\" message", unique("it-"));
    let resp = client
        .post(url("/api/logs"))
        .json(&json!({ "level": "warning", "category": "integration", "message": message }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .get(url("/api/logs/export?category=integration"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "text/csv");
    let csv = resp.text().await.unwrap();
    assert!(csv.starts_with("Time,Level,Category,Message"));
    assert!(csv.contains(&format!("\"{}\"", message.replace('"', "\"\""))));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_function_rejects_missing_fields() {
    let resp = Client::new()
        .post(url("/functions/send-order-status-email"))
        .header("origin", "https://shop.example.in")
        .json(&json!({ "orderId": "abc", "newStatus": "shipped" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Missing required fields");
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_function_reports_unreadable_body() {
    let resp = Client::new()
        .post(url("/functions/send-order-status-email"))
        .header("content-type", "application/json")
        .body("{\"orderId\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Internal server error");
    assert!(body["details"].is_string());
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_function_rejects_out_of_range_items() {
    let resp = Client::new()
        .post(url("/functions/send-order-status-email"))
        .json(&json!({
            "orderId": "abc",
            "newStatus": "shipped",
            "customerEmail": "meera@example.in",
            "orderItems": [{ "name": "Heirloom", "quantity": 2, "price": -5 }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid order items or total");
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_function_preflight() {
    let resp = Client::new()
        .request(reqwest::Method::OPTIONS, url("/functions/send-order-status-email"))
        .header("origin", "https://shop.example.in")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type,apikey")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}
