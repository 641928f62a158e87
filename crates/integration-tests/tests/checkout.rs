//! Checkout, confirmation and receipt download.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{StatusCode, header};

use frost_integration_tests::{TestApp, TestResponse, test_config};

fn order_fields(payment_method: &str) -> Vec<(&'static str, String)> {
    vec![
        ("minecraft_username", "Steve".to_string()),
        ("email", "steve@example.com".to_string()),
        ("discord_tag", "steve#0001".to_string()),
        ("special_instructions", String::new()),
        ("payment_method", payment_method.to_string()),
    ]
}

async fn submit(app: &mut TestApp, fields: &[(&'static str, String)]) -> TestResponse {
    let pairs: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    app.post_form("/checkout", &pairs).await
}

#[tokio::test]
async fn test_empty_cart_redirects_to_cart() {
    let mut app = TestApp::new();

    let page = app.get("/checkout").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/cart"));

    let post = submit(&mut app, &order_fields("paypal")).await;
    assert_eq!(post.location(), Some("/cart"));
}

#[tokio::test]
async fn test_checkout_form_prefilled_from_profile() {
    let mut app = TestApp::new();
    app.register("steve@example.com", "Steve").await;
    app.add_to_cart("rank-vip-rank").await;

    let page = app.get("/checkout").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("value=\"Steve\""));
    assert!(page.body.contains("value=\"steve@example.com\""));
    assert!(page.body.contains("PayPal"));
    assert!(page.body.contains("GCash"));
}

#[tokio::test]
async fn test_successful_checkout() {
    let mut app = TestApp::new();
    app.register("steve@example.com", "Steve").await;
    app.add_to_cart("rank-vip-rank").await;
    app.add_to_cart("key-rare-crate-key").await;

    let response = submit(&mut app, &order_fields("card")).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/checkout/success"));
    assert_eq!(app.cart_json().await["itemCount"], 0);
    assert_eq!(app.cart_json().await["isOpen"], false);
    assert_eq!(app.store.purchase_count().await, 1);

    let success = app.get("/checkout/success").await;
    assert_eq!(success.status, StatusCode::OK);
    assert!(success.body.contains("MC-"));
    assert!(success.body.contains("$17.98"));

    let dashboard = app.get("/dashboard").await;
    assert!(dashboard.body.contains("$17.98"));
}

#[tokio::test]
async fn test_receipt_download() {
    let mut app = TestApp::new();
    app.register("steve@example.com", "Steve").await;
    app.add_to_cart("rank-vip-rank").await;
    submit(&mut app, &order_fields("gcash")).await;

    let receipt = app.get("/checkout/receipt").await;

    assert_eq!(receipt.status, StatusCode::OK);
    let disposition = receipt
        .headers
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    let prefix = "attachment; filename=\"frost-receipt-MC-";
    assert!(disposition.starts_with(prefix));
    assert!(receipt.body.contains("Frost Network"));
    assert!(receipt.body.contains("VIP Rank"));
    assert!(receipt.body.contains("GCash"));
    assert!(receipt.body.contains("steve#0001"));
}

#[tokio::test]
async fn test_receipt_without_order_is_not_found() {
    let mut app = TestApp::new();

    let receipt = app.get("/checkout/receipt").await;
    assert_eq!(receipt.status, StatusCode::NOT_FOUND);

    let success = app.get("/checkout/success").await;
    assert_eq!(success.location(), Some("/"));
}

#[tokio::test]
async fn test_missing_field_keeps_cart() {
    let mut app = TestApp::new();
    app.register("steve@example.com", "Steve").await;
    app.add_to_cart("rank-vip-rank").await;
    let mut fields = order_fields("paypal");
    fields[0].1 = "   ".to_string();

    let response = submit(&mut app, &fields).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let message = "Please fill in your Minecraft username.";
    assert!(response.body.contains(message));
    assert!(response.body.contains("value=\"steve@example.com\""));
    assert_eq!(app.cart_json().await["itemCount"], 1);
    assert_eq!(app.store.purchase_count().await, 0);
}

#[tokio::test]
async fn test_unknown_payment_method() {
    let mut app = TestApp::new();
    app.register("steve@example.com", "Steve").await;
    app.add_to_cart("rank-vip-rank").await;

    let response = submit(&mut app, &order_fields("bitcoin")).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Please choose a payment method."));
}

#[tokio::test]
async fn test_declined_payment_keeps_cart() {
    let mut config = test_config();
    config.payment.failure_rate = 1.0;
    let mut app = TestApp::with_config(config);
    app.register("steve@example.com", "Steve").await;
    app.add_to_cart("rank-vip-rank").await;

    let response = submit(&mut app, &order_fields("paypal")).await;

    assert_eq!(response.status, StatusCode::PAYMENT_REQUIRED);
    assert!(response.body.contains("insufficient funds"));
    assert_eq!(app.cart_json().await["itemCount"], 1);
    assert_eq!(app.store.purchase_count().await, 0);
}

#[tokio::test]
async fn test_checkout_updates_leaderboard() {
    let mut app = TestApp::new();
    assert!(app.get("/api/leaderboard").await.json()["leaderboard"]
        .as_array()
        .unwrap()
        .is_empty());

    app.register("steve@example.com", "Steve").await;
    app.add_to_cart("rank-vip-rank").await;
    submit(&mut app, &order_fields("paypal")).await;

    let body = app.get("/api/leaderboard").await.json();
    assert_eq!(body["leaderboard"][0]["minecraftUsername"], "Steve");
    assert_eq!(body["leaderboard"][0]["totalPurchases"], 1);
}
