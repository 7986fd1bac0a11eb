//! JSON API route handlers.
//!
//! Success bodies carry `"ok": true`; failures go through
//! [`AppError`](crate::error::AppError) and carry `"ok": false` plus a
//! message.

pub mod checkout;
pub mod stock;

use axum::{
    Router,
    body::Bytes,
    extract::{FromRequest, Request},
    routing::{get, post},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::state::AppState;

/// Build the API router (mounted under `/api`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stock", get(stock::get_stock))
        .route("/purchase", post(stock::purchase))
        .route("/checkout", post(checkout::checkout))
        .route("/admin/set-stock", post(stock::set_stock))
}

/// Lenient JSON body extractor.
///
/// Bots are sloppy: the body is parsed as JSON regardless of `Content-Type`,
/// an empty body yields `T::default()`, and decode failures become a JSON
/// `400` instead of axum's plain-text rejection.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))
    }
}
