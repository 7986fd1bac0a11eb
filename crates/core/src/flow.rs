//! Purchase, checkout, and admin operations over any [`StockStore`].
//!
//! The storefront handlers and the local CLI both call these, so the rules
//! (availability check before validation, no mutation on failure) live in one
//! place.

use chrono::Utc;
use serde_json::Value;

use crate::auth::AdminAuthorizer;
use crate::checkout::{CheckoutRecord, CheckoutSubmission, validate};
use crate::error::FlowError;
use crate::stock::{StockStore, check_available, parse_admin_level};

/// Generic message returned for an accepted checkout.
pub const CHECKOUT_SUCCESS_MESSAGE: &str = "Order placed successfully";

/// Result of an accepted checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    /// Loggable record; holds the masked card only.
    pub record: CheckoutRecord,
    /// Stock level after the decrement.
    pub stock: u32,
}

/// Buy `qty` units.
///
/// # Errors
///
/// Returns `OutOfStock` or `InsufficientStock` without mutating, or a storage
/// error.
pub fn purchase<S>(store: &S, qty: u32) -> Result<u32, FlowError>
where
    S: StockStore + ?Sized,
{
    check_available(store.get()?, qty)?;
    Ok(store.decrement(qty)?)
}

/// Validate a checkout submission and, if it passes, take its quantity out of
/// stock.
///
/// Availability is checked before validation, matching the purchase flow.
///
/// # Errors
///
/// Returns the stock error or the first validation error. Stock is unchanged
/// on any error.
pub fn checkout<S>(store: &S, submission: &CheckoutSubmission) -> Result<CheckoutReceipt, FlowError>
where
    S: StockStore + ?Sized,
{
    check_available(store.get()?, submission.quantity())?;
    let validated = validate(submission)?;
    let stock = store.decrement(validated.quantity)?;

    Ok(CheckoutReceipt {
        record: CheckoutRecord::new(validated, Utc::now()),
        stock,
    })
}

/// Overwrite the stock level on behalf of an admin.
///
/// The key is checked before the value is even parsed, so a bad key never
/// reaches the store.
///
/// # Errors
///
/// Returns `Unauthorized`, `InvalidStockValue`, or a storage error.
pub fn set_stock<S, A>(
    store: &S,
    authorizer: &A,
    key: &str,
    value: Option<&Value>,
) -> Result<u32, FlowError>
where
    S: StockStore + ?Sized,
    A: AdminAuthorizer + ?Sized,
{
    authorizer.authorize(key)?;
    let level = parse_admin_level(value)?;
    Ok(store.set(level)?)
}
