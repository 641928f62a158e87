//! Integration test harness for the Frost Network storefront.
//!
//! [`TestApp`] builds the full router over a [`MemoryStore`] and an
//! in-memory session store, then drives it with `tower::ServiceExt::oneshot`.
//! It carries the session cookie between requests the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p frost-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use secrecy::SecretString;
use tower::ServiceExt;
use tower_sessions::MemoryStore as SessionMemoryStore;

use frost_core::{Email, UserRole};
use frost_storefront::config::{DEFAULT_DISCORD_INVITE, PaymentConfig, StorefrontConfig};
use frost_storefront::db::{MemoryStore, UserStore};
use frost_storefront::middleware::create_session_layer;
use frost_storefront::middleware::session::SESSION_COOKIE_NAME;
use frost_storefront::routes;
use frost_storefront::state::AppState;

/// Password used by [`TestApp::register`].
pub const TEST_PASSWORD: &str = "diamonds123";

/// Configuration for tests: plain http, no payment delay, payments succeed.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://localhost/frost_test"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("k8Jq2vX9mZ4pL7wR1tY6nB3cF5hG0dSa"),
        payment: PaymentConfig {
            delay: Duration::ZERO,
            failure_rate: 0.0,
        },
        discord_invite: DEFAULT_DISCORD_INVITE.to_string(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A fully decoded response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Body parsed as JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// The storefront router plus the stores behind it and one browser session.
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
    cookie: Option<String>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let session_layer = create_session_layer(SessionMemoryStore::default(), &config);
        let state = AppState::new(config, store.clone(), store.clone());
        let router = frost_storefront::app(state, session_layer, routes::routes());
        Self {
            router,
            store,
            cookie: None,
        }
    }

    /// A second visitor on the same app and stores, with no cookie.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            store: Arc::clone(&self.store),
            cookie: None,
        }
    }

    fn remember_cookie(&mut self, headers: &HeaderMap) {
        let prefix = format!("{SESSION_COOKIE_NAME}=");
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let Some(pair) = raw.split(';').next() else { continue };
            if !pair.starts_with(&prefix) {
                continue;
            }
            let expired =
                pair.len() == prefix.len() || raw.to_ascii_lowercase().contains("max-age=0");
            self.cookie = if expired {
                None
            } else {
                Some(pair.to_string())
            };
        }
    }

    /// Send a request with the current session cookie.
    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        self.remember_cookie(&headers);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// POST an urlencoded form.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = form_body(fields);
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// POST an urlencoded form as HTMX does.
    pub async fn post_htmx(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = form_body(fields);
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("hx-request", "true")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// POST a JSON body.
    pub async fn post_json(&mut self, uri: &str, body: &serde_json::Value) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Register through the HTML form, which also signs the visitor in.
    pub async fn register(&mut self, email: &str, minecraft_username: &str) -> TestResponse {
        let response = self
            .post_form(
                "/auth/register",
                &[
                    ("email", email),
                    ("password", TEST_PASSWORD),
                    ("password_confirm", TEST_PASSWORD),
                    ("minecraft_username", minecraft_username),
                ],
            )
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.body);
        assert_eq!(response.location(), Some("/dashboard"));
        response
    }

    pub async fn login(&mut self, email: &str) -> TestResponse {
        self.post_form(
            "/auth/login",
            &[("email", email), ("password", TEST_PASSWORD)],
        )
        .await
    }

    /// Register an account, grant it the admin role, and sign in again so
    /// the session picks the role up.
    pub async fn sign_in_admin(&mut self, email: &str) {
        self.register(email, "FrostAdmin").await;
        let granted = self
            .store
            .set_role(&Email::parse(email).unwrap(), UserRole::Admin)
            .await
            .unwrap();
        assert!(granted);
        self.post_form("/auth/logout", &[]).await;
        let response = self.login(email).await;
        assert_eq!(response.location(), Some("/dashboard"));
    }

    /// Add a catalog product to the cart with a plain form post.
    pub async fn add_to_cart(&mut self, product_id: &str) -> TestResponse {
        self.post_form(
            "/cart/add",
            &[("product_id", product_id), ("next", "/cart")],
        )
        .await
    }

    /// The session cart as served by `/api/cart`.
    pub async fn cart_json(&mut self) -> serde_json::Value {
        self.get("/api/cart").await.json()
    }
}

fn form_body(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}
