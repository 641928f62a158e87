//! Public pages, health checks and response headers.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use frost_integration_tests::TestApp;

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::new();

    let live = app.get("/health").await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body, "ok");

    assert_eq!(app.get("/health/ready").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_public_pages_render() {
    let mut app = TestApp::new();

    for page in [
        "/",
        "/ranks",
        "/keys",
        "/unbans",
        "/partners",
        "/terms",
        "/privacy",
        "/cart",
        "/auth/login",
        "/auth/register",
    ] {
        let response = app.get(page).await;
        assert_eq!(response.status, StatusCode::OK, "{page}");
        assert!(response.body.contains("<html"), "{page}");
    }
}

#[tokio::test]
async fn test_catalog_pages_list_products() {
    let mut app = TestApp::new();

    let ranks = app.get("/ranks").await;
    assert!(ranks.body.contains("VIP Rank"));
    assert!(ranks.body.contains("Mythic Rank"));
    assert!(ranks.body.contains("$49.99"));

    let keys = app.get("/keys").await;
    assert!(keys.body.contains("Rare Crate Key"));
    assert!(keys.body.contains("Ultimate Key Bundle"));

    let unbans = app.get("/unbans").await;
    assert!(unbans.body.contains("Express Unban"));
}

#[tokio::test]
async fn test_home_shows_leaderboard_section() {
    let mut app = TestApp::new();

    let home = app.get("/").await;

    assert!(home.body.contains("id=\"leaderboard\""));
    assert!(!home.body.contains("leaderboard is unavailable"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let mut app = TestApp::new();

    assert_eq!(app.get("/no-such-page").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers_present() {
    let mut app = TestApp::new();

    let response = app.get("/").await;

    assert_eq!(response.headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(
        response.headers.get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert!(response.headers.contains_key("content-security-policy"));
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let mut app = TestApp::new();
    let request = axum::http::Request::get("/health")
        .header("x-request-id", "req-123")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.headers.get("x-request-id").unwrap(), "req-123");
}
