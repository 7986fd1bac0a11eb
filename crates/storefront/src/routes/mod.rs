//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! # Pages (HTML)
//! GET  /                       - Storefront with stock counter and buy button
//! GET  /checkout               - Checkout form
//! GET  /admin?key=             - Admin panel (401 page on bad key)
//!
//! # API (JSON)
//! GET  /api/stock              - Current stock level
//! POST /api/purchase           - Buy `qty` units
//! POST /api/checkout           - Validate card details and buy
//! POST /api/admin/set-stock    - Overwrite stock level (requires key)
//! ```
//!
//! Every page polls `/api/stock` every [`POLL_INTERVAL_MS`] milliseconds.

pub mod admin;
pub mod api;
pub mod checkout;
pub mod home;

use axum::{Router, routing::get};

use crate::state::AppState;

/// How often page scripts refresh the stock counter.
pub const POLL_INTERVAL_MS: u64 = 3_000;

/// Create the HTML page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/checkout", get(checkout::checkout_page))
        .route("/admin", get(admin::admin_page))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(page_routes())
        .nest("/api", api::router())
}
