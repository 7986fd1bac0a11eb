//! Stock commands: show, buy, set, reset.

use std::io::Write;

use dropzone_core::checkout::normalize_quantity;
use dropzone_core::flow;
use dropzone_core::stock::parse_strict_level;
use dropzone_core::StockStore;
use serde_json::Value;

use super::CommandError;
use crate::local_store::FileStockStore;

/// Print the current stock level.
///
/// # Errors
///
/// Returns `CommandError` if the store cannot be read.
pub fn show(store: &FileStockStore, out: &mut impl Write) -> Result<(), CommandError> {
    let stock = store.get()?;
    writeln!(out, "{stock}")?;
    Ok(())
}

/// Buy `qty` units (default 1) through the shared purchase flow.
///
/// The purchase is simulated: it is logged, nothing else happens.
///
/// # Errors
///
/// Returns `CommandError` for `OutOfStock`, `InsufficientStock`, or storage
/// failures. Stock is unchanged on error.
pub fn buy(
    store: &FileStockStore,
    qty: Option<String>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let qty = normalize_quantity(qty.map(Value::String).as_ref());
    let stock = flow::purchase(store, qty)?;

    tracing::info!(qty, stock, "Simulated purchase");
    writeln!(out, "Purchased {qty}. Stock left: {stock}")?;
    Ok(())
}

/// Overwrite the stock level.
///
/// Unlike the HTTP admin endpoint, negative and non-numeric values are
/// rejected rather than clamped.
///
/// # Errors
///
/// Returns `CommandError` with `InvalidStockValue` for bad input, or a storage
/// error. Stock is unchanged on error.
pub fn set(store: &FileStockStore, value: &str, out: &mut impl Write) -> Result<(), CommandError> {
    let level = parse_strict_level(value)?;
    let stock = store.set(level)?;

    tracing::info!(stock, "Stock level set");
    writeln!(out, "Stock set to {stock}")?;
    Ok(())
}

/// Clear the stored level so it reverts to the default.
///
/// # Errors
///
/// Returns `CommandError` if the store cannot be written.
pub fn reset(store: &FileStockStore, out: &mut impl Write) -> Result<(), CommandError> {
    store.clear()?;
    let stock = store.get()?;

    tracing::info!(path = %store.path().display(), "Stock storage cleared");
    writeln!(out, "Stock reset to {stock}")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dropzone_core::{DEFAULT_STOCK, FlowError, StockError, ValidationError};

    use super::*;

    fn store(dir: &tempfile::TempDir) -> FileStockStore {
        FileStockStore::new(dir.path().join("store.json"), DEFAULT_STOCK)
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_show_default() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        show(&store(&dir), &mut out).unwrap();
        assert_eq!(output(out), "1\n");
    }

    #[test]
    fn test_buy_then_sold_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let mut out = Vec::new();
        buy(&store, None, &mut out).unwrap();
        assert_eq!(output(out), "Purchased 1. Stock left: 0\n");

        let err = buy(&store, None, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Flow(FlowError::Stock(StockError::OutOfStock))
        ));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_buy_quantity_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.set(10.0).unwrap();
        buy(&store, Some("3.8".to_string()), &mut Vec::new()).unwrap();
        assert_eq!(store.get().unwrap(), 7);
        buy(&store, Some("zero".to_string()), &mut Vec::new()).unwrap();
        assert_eq!(store.get().unwrap(), 6);
    }

    #[test]
    fn test_set_rejects_negative_and_nan() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.set(4.0).unwrap();

        for bad in ["-5", "NaN", "abc", "inf"] {
            let err = set(&store, bad, &mut Vec::new()).unwrap_err();
            assert!(
                matches!(
                    err,
                    CommandError::Flow(FlowError::Validation(ValidationError::InvalidStockValue(_)))
                ),
                "{bad} should be rejected"
            );
        }
        assert_eq!(store.get().unwrap(), 4);
    }

    #[test]
    fn test_set_truncates_fraction() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let mut out = Vec::new();
        set(&store, "9.7", &mut out).unwrap();
        assert_eq!(output(out), "Stock set to 9\n");
    }

    #[test]
    fn test_reset_restores_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.set(30.0).unwrap();
        let mut out = Vec::new();
        reset(&store, &mut out).unwrap();
        assert_eq!(output(out), "Stock reset to 1\n");
    }
}
