//! Storefront page.

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

/// Storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub stock: u32,
    pub nonce: String,
    pub poll_interval_ms: u64,
}

/// Display the storefront with the current stock level.
#[instrument(skip(state, nonce))]
pub async fn home(State(state): State<AppState>, CspNonce(nonce): CspNonce) -> Result<HomeTemplate> {
    let stock = state.stock().get().map_err(FlowError::from)?;

    Ok(HomeTemplate {
        stock,
        nonce,
        poll_interval_ms: POLL_INTERVAL_MS,
    })
}
