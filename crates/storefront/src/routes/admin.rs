//! Admin panel page.
//!
//! Guarded by the shared admin key passed as `?key=`. The key is embedded in
//! the rendered page so its script can call `/api/admin/set-stock`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dropzone_core::FlowError;
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::CspNonce;
use crate::routes::POLL_INTERVAL_MS;
use crate::state::AppState;

/// Query string for the admin page.
#[derive(Default, Deserialize)]
pub struct AdminQuery {
    #[serde(default)]
    pub key: String,
}

/// Admin panel template.
#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub stock: u32,
    pub admin_key: String,
    pub fallback_key: bool,
    pub nonce: String,
    pub poll_interval_ms: u64,
}

/// 401 page template.
#[derive(Template, WebTemplate)]
#[template(path = "unauthorized.html")]
pub struct UnauthorizedTemplate {
    pub nonce: String,
    pub poll_interval_ms: u64,
}

/// Display the admin panel, or a 401 page if the key does not match.
#[instrument(skip_all)]
pub async fn admin_page(
    State(state): State<AppState>,
    CspNonce(nonce): CspNonce,
    Query(query): Query<AdminQuery>,
) -> Response {
    if state.authorizer().authorize(&query.key).is_err() {
        tracing::warn!("Admin page requested with invalid key");
        return (
            StatusCode::UNAUTHORIZED,
            UnauthorizedTemplate {
                nonce,
                poll_interval_ms: POLL_INTERVAL_MS,
            },
        )
            .into_response();
    }

    match state.stock().get() {
        Ok(stock) => AdminTemplate {
            stock,
            admin_key: query.key,
            fallback_key: state.config().admin_key_is_fallback,
            nonce,
            poll_interval_ms: POLL_INTERVAL_MS,
        }
        .into_response(),
        Err(e) => AppError::from(FlowError::from(e)).into_response(),
    }
}
