//! Dropzone Storefront library.
//!
//! The binary in `main.rs` only loads configuration, sets up tracing and
//! Sentry, and serves [`app`]. Everything else lives here so the router can be
//! exercised in tests without binding a port.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{Router, extract::Request, middleware::from_fn, routing::get};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full storefront router with its middleware stack.
///
/// Sentry layers are not included; `main` adds them outermost.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .with_state(state)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::csp_nonce_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                // Path only: `/admin?key=` would put the admin secret in every line.
                path = %request.uri().path(),
                request_id = tracing::field::Empty,
            )
        }))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
