//! Offline checkout command.

use std::io::Write;

use dropzone_core::flow::{self, CHECKOUT_SUCCESS_MESSAGE};
use dropzone_core::CheckoutSubmission;
use serde_json::Value;

use super::CommandError;
use crate::local_store::FileStockStore;

/// Card details as typed on the command line.
pub struct CheckoutArgs {
    pub name: String,
    pub card: String,
    pub expiry: String,
    pub cvc: String,
    pub qty: Option<String>,
}

impl From<CheckoutArgs> for CheckoutSubmission {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            name: args.name,
            card_number: args.card,
            expiry: args.expiry,
            cvc: args.cvc,
            qty: args.qty.map(Value::String),
        }
    }
}

/// Run the shared checkout flow against the local store.
///
/// Only the masked card number is logged or printed.
///
/// # Errors
///
/// Returns `CommandError` for stock or validation failures. Stock is unchanged
/// on error.
pub fn run(
    store: &FileStockStore,
    args: CheckoutArgs,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let submission = CheckoutSubmission::from(args);
    let receipt = flow::checkout(store, &submission)?;
    let record = &receipt.record;

    tracing::info!(
        name = %record.name,
        card = %record.masked_card,
        expiry = %record.expiry,
        qty = record.quantity,
        at = %record.at.to_rfc3339(),
        "Simulated checkout"
    );
    writeln!(
        out,
        "{CHECKOUT_SUCCESS_MESSAGE}: {} x {} ({}). Stock left: {}",
        record.quantity, record.masked_card, record.name, receipt.stock
    )?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use dropzone_core::{FlowError, StockStore, ValidationError};

    use super::*;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn args(card: &str) -> CheckoutArgs {
        CheckoutArgs {
            name: "Local Bot".to_string(),
            card: card.to_string(),
            expiry: "03/29".to_string(),
            cvc: "4321".to_string(),
            qty: Some("2".to_string()),
        }
    }

    #[test]
    fn test_checkout_prints_masked_card_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStockStore::new(dir.path().join("store.json"), 5);
        let mut out = Vec::new();
        run(&store, args("4242 4242 4242 4242"), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("424242******4242"));
        assert!(!text.contains("4242424242424242"));
        assert!(!text.contains("4321"));
        assert!(text.ends_with("Stock left: 3\n"));
        assert_eq!(store.get().unwrap(), 3);

        let persisted = std::fs::read_to_string(store.path()).unwrap();
        assert!(!persisted.contains("4242"));
    }

    #[test]
    fn test_checkout_invalid_card_leaves_stock() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStockStore::new(dir.path().join("store.json"), 5);
        let err = run(&store, args("4242424242424241"), &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Flow(FlowError::Validation(ValidationError::InvalidCard))
        ));
        assert_eq!(store.get().unwrap(), 5);
    }

    #[test]
    fn test_checkout_log_has_masked_card_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStockStore::new(dir.path().join("store.json"), 5);

        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            run(&store, args("4242-4242-4242-4242"), &mut Vec::new()).unwrap();
        });

        let logs = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("Simulated checkout"), "{logs}");
        assert!(logs.contains("card=424242******4242"), "{logs}");
        assert!(!logs.contains("4242424242424242"), "{logs}");
        assert!(!logs.contains("4242-4242-4242-4242"), "{logs}");
        // `at=` carries nanoseconds, which could contain any digit run.
        assert!(
            !logs
                .split_whitespace()
                .filter(|token| !token.starts_with("at="))
                .any(|token| token.contains("4321")),
            "{logs}"
        );
    }
}
