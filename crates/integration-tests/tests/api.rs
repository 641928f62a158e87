//! JSON API: registration and leaderboard.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;

use frost_core::{OrderNumber, Price, PurchaseStatus, UserId};
use frost_integration_tests::TestApp;
use frost_storefront::db::{NewPurchase, PurchaseStore};

#[tokio::test]
async fn test_register_returns_public_user() {
    let mut app = TestApp::new();

    let response = app
        .post_json(
            "/api/auth/register",
            &json!({
                "email": "alex@example.com",
                "password": "emeralds99",
                "minecraftUsername": "Alex"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "alex@example.com");
    assert_eq!(body["user"]["minecraftUsername"], "Alex");
    assert!(body["user"]["id"].is_number());
    assert!(body["user"]["createdAt"].is_string());
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_register_missing_field() {
    let mut app = TestApp::new();

    let response = app
        .post_json(
            "/api/auth/register",
            &json!({ "email": "alex@example.com", "password": "emeralds99" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "All fields are required");
    assert_eq!(app.store.account_count().await, 0);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let mut app = TestApp::new();
    let payload = json!({
        "email": "alex@example.com",
        "password": "emeralds99",
        "minecraftUsername": "Alex"
    });
    app.post_json("/api/auth/register", &payload).await;

    let response = app.post_json("/api/auth/register", &payload).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.json()["error"], "Email already registered");
    assert_eq!(app.store.account_count().await, 1);
}

#[tokio::test]
async fn test_register_invalid_json() {
    let mut app = TestApp::new();
    let request = axum::http::Request::post("/api/auth/register")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"].is_string());
}

#[tokio::test]
async fn test_register_does_not_sign_in() {
    let mut app = TestApp::new();
    app.post_json(
        "/api/auth/register",
        &json!({
            "email": "alex@example.com",
            "password": "emeralds99",
            "minecraftUsername": "Alex"
        }),
    )
    .await;

    let response = app.get("/dashboard").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/auth/login"));
}

async fn api_user(app: &mut TestApp, n: usize) -> UserId {
    let response = app
        .post_json(
            "/api/auth/register",
            &json!({
                "email": format!("player{n}@example.com"),
                "password": "emeralds99",
                "minecraftUsername": format!("Player{n}")
            }),
        )
        .await;
    let id = response.json()["user"]["id"].as_i64().unwrap();
    UserId::new(i32::try_from(id).unwrap())
}

async fn spend(app: &TestApp, user_id: UserId, cents: i64, status: PurchaseStatus) {
    let now = Utc::now();
    app.store
        .record(NewPurchase {
            user_id,
            order_number: OrderNumber::at(now),
            items: Vec::new(),
            total: Price::from_cents(cents),
            status,
            created_at: now,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_leaderboard_empty() {
    let mut app = TestApp::new();

    let response = app.get("/api/leaderboard").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], true);
    assert!(body["leaderboard"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_leaderboard_sorted_and_capped() {
    let mut app = TestApp::new();
    for n in 1..=12 {
        let id = api_user(&mut app, n).await;
        let cents = i64::try_from(n).unwrap() * 1000;
        spend(&app, id, cents, PurchaseStatus::Completed).await;
    }

    let body = app.get("/api/leaderboard").await.json();
    let rows = body["leaderboard"].as_array().unwrap();

    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["rank"], 1);
    assert_eq!(rows[0]["minecraftUsername"], "Player12");
    assert_eq!(rows[0]["totalPurchases"], 1);
    let top = rows[0]["totalSpent"].as_f64().unwrap();
    assert!((top - 120.0).abs() < f64::EPSILON);
    assert_eq!(rows[9]["rank"], 10);
    assert_eq!(rows[9]["minecraftUsername"], "Player3");

    let totals: Vec<f64> = rows
        .iter()
        .map(|row| row["totalSpent"].as_f64().unwrap())
        .collect();
    assert!(totals.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn test_leaderboard_ignores_unfinished_purchases() {
    let mut app = TestApp::new();
    let paid = api_user(&mut app, 1).await;
    let pending = api_user(&mut app, 2).await;
    spend(&app, paid, 500, PurchaseStatus::Completed).await;
    spend(&app, paid, 250, PurchaseStatus::Completed).await;
    spend(&app, pending, 99_999, PurchaseStatus::Pending).await;
    spend(&app, pending, 99_999, PurchaseStatus::Failed).await;

    let body = app.get("/api/leaderboard").await.json();
    let rows = body["leaderboard"].as_array().unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["minecraftUsername"], "Player1");
    assert_eq!(rows[0]["totalPurchases"], 2);
    let spent = rows[0]["totalSpent"].as_f64().unwrap();
    assert!((spent - 7.5).abs() < f64::EPSILON);
}
