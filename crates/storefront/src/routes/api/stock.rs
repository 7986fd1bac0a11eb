//! Stock API handlers: read, purchase, admin set.

use axum::{Json, extract::State};
use dropzone_core::flow;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::error::Result;
use crate::routes::api::ApiJson;
use crate::state::AppState;

/// Response for `GET /api/stock`.
#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub stock: u32,
}

/// Request for `POST /api/purchase`.
#[derive(Debug, Default, Deserialize)]
pub struct PurchaseRequest {
    #[serde(default, alias = "quantity")]
    pub qty: Option<Value>,
}

/// Response for a successful purchase or set-stock.
#[derive(Debug, Serialize)]
pub struct StockUpdateResponse {
    pub ok: bool,
    pub stock: u32,
}

/// Request for `POST /api/admin/set-stock`.
#[derive(Default, Deserialize)]
pub struct SetStockRequest {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub stock: Option<Value>,
}

/// Current stock level.
///
/// GET /api/stock
///
/// # Errors
///
/// Returns `AppError` if the store cannot be read.
pub async fn get_stock(State(state): State<AppState>) -> Result<Json<StockResponse>> {
    let stock = state.stock().get().map_err(dropzone_core::FlowError::from)?;
    Ok(Json(StockResponse { stock }))
}

/// Buy units without a checkout form.
///
/// POST /api/purchase
///
/// # Errors
///
/// Returns `AppError` (400) for `OutOfStock` or `InsufficientStock`; stock is
/// unchanged in that case.
#[instrument(skip_all)]
pub async fn purchase(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PurchaseRequest>,
) -> Result<Json<StockUpdateResponse>> {
    let qty = dropzone_core::checkout::normalize_quantity(body.qty.as_ref());
    let stock = flow::purchase(state.stock(), qty)?;

    tracing::info!(qty, stock, "Purchase accepted");
    Ok(Json(StockUpdateResponse { ok: true, stock }))
}

/// Overwrite the stock level.
///
/// POST /api/admin/set-stock
///
/// # Errors
///
/// Returns `AppError` (401) if the key does not match, or (400) if `stock`
/// is not numeric.
#[instrument(skip_all)]
pub async fn set_stock(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SetStockRequest>,
) -> Result<Json<StockUpdateResponse>> {
    let stock = flow::set_stock(
        state.stock(),
        state.authorizer(),
        &body.key,
        body.stock.as_ref(),
    )?;

    tracing::info!(stock, "Stock level set by admin");
    Ok(Json(StockUpdateResponse { ok: true, stock }))
}
