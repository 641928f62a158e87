//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured products, leaderboard)
//! GET  /ranks /keys /unbans    - Catalog pages
//! GET  /partners /terms /privacy
//! GET  /health /health/ready   - Liveness and readiness checks
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (requires login, opens drawer)
//! POST /cart/update            - Set quantity (0 removes)
//! POST /cart/remove            - Remove line
//! POST /cart/clear             - Empty the cart
//! POST /cart/open|close|toggle - Drawer visibility
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Checkout form
//! POST /checkout               - Run the simulated payment
//! GET  /checkout/success       - Confirmation
//! GET  /checkout/receipt       - Receipt download
//!
//! # Auth (POSTs rate limited)
//! GET|POST /auth/login
//! GET|POST /auth/register
//! POST /auth/logout
//!
//! # Account (requires auth)
//! GET  /dashboard              - Profile and purchase history
//! GET|POST /settings           - Profile settings
//!
//! # Admin (requires admin role)
//! GET  /admin                  - Analytics
//! GET  /admin/orders           - Orders table
//! GET  /admin/players          - Players table
//! GET|POST /admin/products     - Product list / create
//! GET  /admin/products/{id}/edit
//! POST /admin/products/{id}    - Update
//! POST /admin/products/{id}/delete|featured|visibility
//!
//! # JSON API
//! POST /api/auth/register      - Register (rate limited)
//! GET  /api/leaderboard        - Top spenders
//! GET  /api/cart               - Session cart
//! ```

pub mod account;
pub mod admin;
pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod home;
pub mod layout;
pub mod pages;
pub mod products;

use axum::{
    Router,
    handler::Handler,
    routing::{MethodRouter, get, post},
};

use crate::middleware::rate_limit::{RateLimiterLayer, auth_rate_limiter};
use crate::state::AppState;

/// POST route for a credential endpoint, rate limited when a limiter is given.
fn credential_post<H, T>(handler: H, limiter: Option<&RateLimiterLayer>) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    let route = post(handler);
    match limiter {
        Some(layer) => route.layer(layer.clone()),
        None => route,
    }
}

/// Create the auth routes router.
fn auth_routes(limiter: Option<&RateLimiterLayer>) -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(credential_post(auth::login, limiter)),
        )
        .route(
            "/register",
            get(auth::register_page).merge(credential_post(auth::register, limiter)),
        )
        .route("/logout", post(auth::logout))
}

/// Create the JSON API router.
fn api_routes(limiter: Option<&RateLimiterLayer>) -> Router<AppState> {
    Router::new()
        .route("/auth/register", credential_post(api::register, limiter))
        .route("/leaderboard", get(api::leaderboard))
        .route("/cart", get(api::cart))
}

/// Create the cart routes router.
fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
        .route("/toggle", post(cart::toggle))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::place_order))
        .route("/success", get(checkout::success))
        .route("/receipt", get(checkout::receipt))
}

/// Create the admin routes router.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route("/orders", get(admin::orders))
        .route("/players", get(admin::players))
        .route(
            "/products",
            get(admin::products).post(admin::create_product),
        )
        .route("/products/{id}", post(admin::update_product))
        .route("/products/{id}/edit", get(admin::edit_product))
        .route("/products/{id}/delete", post(admin::delete_product))
        .route("/products/{id}/featured", post(admin::toggle_featured))
        .route("/products/{id}/visibility", post(admin::toggle_visibility))
}

fn build(limiter: Option<&RateLimiterLayer>) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Catalog
        .route("/ranks", get(products::ranks))
        .route("/keys", get(products::keys))
        .route("/unbans", get(products::unbans))
        // Static pages
        .route("/partners", get(pages::partners))
        .route("/terms", get(pages::terms))
        .route("/privacy", get(pages::privacy))
        // Account
        .route("/dashboard", get(account::dashboard))
        .route(
            "/settings",
            get(account::settings_page).post(account::update_settings),
        )
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/auth", auth_routes(limiter))
        .nest("/admin", admin_routes())
        .nest("/api", api_routes(limiter))
}

/// All storefront routes without rate limiting.
///
/// Used by tests, which drive the router without a peer address.
pub fn routes() -> Router<AppState> {
    build(None)
}

/// All storefront routes with the credential endpoints rate limited per
/// client IP.
pub fn routes_with_rate_limits() -> Router<AppState> {
    build(Some(&auth_rate_limiter()))
}
