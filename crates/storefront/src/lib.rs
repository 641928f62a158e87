//! Frost Network storefront library.
//!
//! The binary in `main.rs` wires this router to Postgres; the integration
//! tests drive the same router over in-memory stores.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin_data;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Assemble the application: `routes`, static files, sessions and the
/// request id / security header middleware.
///
/// Pass [`routes::routes_with_rate_limits`] in production and
/// [`routes::routes`] when there is no peer address to key limits on.
pub fn app<S>(
    state: AppState,
    session_layer: SessionManagerLayer<S>,
    routes: Router<AppState>,
) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .merge(routes)
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
