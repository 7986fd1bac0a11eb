//! Checkout form page.
//!
//! The form posts to `/api/checkout` from the page script; nothing is
//! submitted as a classic form post.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use dropzone_core::FlowError;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::routes::POLL_INTERVAL_MS;
use crate::state::AppState;

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub stock: u32,
    pub nonce: String,
    pub poll_interval_ms: u64,
}

/// Display the checkout form.
#[instrument(skip(state, nonce))]
pub async fn checkout_page(
    State(state): State<AppState>,
    CspNonce(nonce): CspNonce,
) -> Result<CheckoutTemplate> {
    let stock = state.stock().get().map_err(FlowError::from)?;

    Ok(CheckoutTemplate {
        stock,
        nonce,
        poll_interval_ms: POLL_INTERVAL_MS,
    })
}
