//! Checkout API handler.
//!
//! Card details are validated for shape and immediately dropped. Only the
//! masked card number reaches the logs, and the response never echoes any
//! card data.

use axum::{Json, extract::State};
use dropzone_core::{CheckoutSubmission, flow};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::routes::api::ApiJson;
use crate::state::AppState;

/// Response for a successful checkout.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub ok: bool,
    pub message: &'static str,
    pub stock: u32,
}

/// Validate card details and buy.
///
/// POST /api/checkout
///
/// # Errors
///
/// Returns `AppError` (400) for stock or validation failures; stock is
/// unchanged in that case.
#[instrument(skip_all)]
pub async fn checkout(
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<CheckoutSubmission>,
) -> Result<Json<CheckoutResponse>> {
    let receipt = flow::checkout(state.stock(), &submission)?;
    let record = &receipt.record;

    tracing::info!(
        name = %record.name,
        card = %record.masked_card,
        expiry = %record.expiry,
        qty = record.quantity,
        at = %record.at.to_rfc3339(),
        stock = receipt.stock,
        "Checkout accepted"
    );

    Ok(Json(CheckoutResponse {
        ok: true,
        message: flow::CHECKOUT_SUCCESS_MESSAGE,
        stock: receipt.stock,
    }))
}
