//! Stock level storage.
//!
//! The storefront and CLI never touch a counter directly; they go through a
//! [`StockStore`], which lets the HTTP server run on the in-memory
//! [`MemoryStockStore`] while the CLI persists to a key-value file.
//!
//! ## Invariants
//!
//! - The level is a `u32`, so it can never be negative.
//! - `set` and `decrement` are a single read-modify-write each; no two calls
//!   interleave within one mutation.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::error::{StockError, StoreError, ValidationError};

/// Level a fresh store starts at.
pub const DEFAULT_STOCK: u32 = 1;

/// A single stock counter.
pub trait StockStore: Send + Sync {
    /// Current stock level.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn get(&self) -> Result<u32, StoreError>;

    /// Overwrite the stock level and return the stored value.
    ///
    /// The value is clamped with [`clamp_level`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn set(&self, level: f64) -> Result<u32, StoreError>;

    /// Remove `qty` units and return the new level.
    ///
    /// # Errors
    ///
    /// Returns `StockError::OutOfStock` when the level is zero,
    /// `StockError::InsufficientStock` when `qty` exceeds it, or
    /// `StockError::Store` on storage failure. The level is unchanged on error.
    fn decrement(&self, qty: u32) -> Result<u32, StockError>;
}

/// Clamp an arbitrary number to a valid stock level.
///
/// Negative and non-finite values become 0, fractions truncate toward zero,
/// and anything above `u32::MAX` saturates.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_level(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    // `as` saturates for floats, so values above u32::MAX land on u32::MAX
    value.trunc() as u32
}

/// Check a requested quantity against the current level.
///
/// # Errors
///
/// Returns `OutOfStock` when `current` is zero and `InsufficientStock` when
/// `qty` exceeds it.
pub const fn check_available(current: u32, qty: u32) -> Result<(), StockError> {
    if current == 0 {
        return Err(StockError::OutOfStock);
    }
    if qty > current {
        return Err(StockError::InsufficientStock {
            requested: qty,
            available: current,
        });
    }
    Ok(())
}

/// Parse the `stock` field of an admin set-stock request.
///
/// Accepts JSON numbers and numeric strings. Out-of-range values are left for
/// [`clamp_level`] to handle, so `-5` parses fine and later stores as 0.
///
/// # Errors
///
/// Returns `ValidationError::InvalidStockValue` when the field is missing or
/// not numeric.
pub fn parse_admin_level(raw: Option<&Value>) -> Result<f64, ValidationError> {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::InvalidStockValue(describe(raw)))
}

/// Parse a stock level typed by an operator of the local store.
///
/// Stricter than [`parse_admin_level`]: NaN, infinities, and negative numbers
/// are rejected instead of clamped.
///
/// # Errors
///
/// Returns `ValidationError::InvalidStockValue` for anything that is not a
/// finite, non-negative number.
pub fn parse_strict_level(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidStockValue(trimmed.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidStockValue(trimmed.to_string()));
    }
    Ok(value)
}

fn describe(raw: Option<&Value>) -> String {
    raw.map_or_else(|| "missing".to_string(), ToString::to_string)
}

/// Process-lifetime stock counter.
#[derive(Debug)]
pub struct MemoryStockStore {
    level: Mutex<u32>,
}

impl MemoryStockStore {
    /// Create a store holding `initial` units.
    #[must_use]
    pub const fn new(initial: u32) -> Self {
        Self {
            level: Mutex::new(initial),
        }
    }

    fn lock(&self) -> MutexGuard<'_, u32> {
        // A panic mid-update cannot leave a half-written u32, so poisoning is safe to ignore
        self.level.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStockStore {
    fn default() -> Self {
        Self::new(DEFAULT_STOCK)
    }
}

impl StockStore for MemoryStockStore {
    fn get(&self) -> Result<u32, StoreError> {
        Ok(*self.lock())
    }

    fn set(&self, level: f64) -> Result<u32, StoreError> {
        let mut guard = self.lock();
        *guard = clamp_level(level);
        Ok(*guard)
    }

    fn decrement(&self, qty: u32) -> Result<u32, StockError> {
        let mut guard = self.lock();
        check_available(*guard, qty)?;
        *guard -= qty;
        Ok(*guard)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_default_level_is_one() {
        let store = MemoryStockStore::default();
        assert_eq!(store.get().unwrap(), 1);
    }

    #[test]
    fn test_clamp_level() {
        assert_eq!(clamp_level(-5.0), 0);
        assert_eq!(clamp_level(0.0), 0);
        assert_eq!(clamp_level(3.9), 3);
        assert_eq!(clamp_level(f64::NAN), 0);
        assert_eq!(clamp_level(f64::INFINITY), 0);
        assert_eq!(clamp_level(1e12), u32::MAX);
    }

    #[test]
    fn test_decrement_by_exact_quantity() {
        for initial in 1..=10 {
            for qty in 1..=initial {
                let store = MemoryStockStore::new(initial);
                assert_eq!(store.decrement(qty).unwrap(), initial - qty);
                assert_eq!(store.get().unwrap(), initial - qty);
            }
        }
    }

    #[test]
    fn test_decrement_more_than_available_leaves_stock() {
        let store = MemoryStockStore::new(2);
        let err = store.decrement(3).unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                requested: 3,
                available: 2
            }
        );
        assert_eq!(store.get().unwrap(), 2);
    }

    #[test]
    fn test_decrement_when_empty() {
        let store = MemoryStockStore::new(0);
        assert_eq!(store.decrement(1).unwrap_err(), StockError::OutOfStock);
        assert_eq!(store.get().unwrap(), 0);
    }

    #[test]
    fn test_set_clamps_negative_to_zero() {
        let store = MemoryStockStore::new(4);
        assert_eq!(store.set(-5.0).unwrap(), 0);
        assert_eq!(store.get().unwrap(), 0);
    }

    #[test]
    fn test_concurrent_decrements_never_oversell() {
        let store = Arc::new(MemoryStockStore::new(50));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..20).filter(|_| store.decrement(1).is_ok()).count()
                })
            })
            .collect();

        let sold: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(sold, 50);
        assert_eq!(store.get().unwrap(), 0);
    }

    #[test]
    fn test_parse_admin_level() {
        assert!((parse_admin_level(Some(&json!(7))).unwrap() - 7.0).abs() < f64::EPSILON);
        assert!((parse_admin_level(Some(&json!("-5"))).unwrap() + 5.0).abs() < f64::EPSILON);
        assert!(matches!(
            parse_admin_level(None),
            Err(ValidationError::InvalidStockValue(_))
        ));
        assert!(matches!(
            parse_admin_level(Some(&json!("lots"))),
            Err(ValidationError::InvalidStockValue(_))
        ));
        assert!(matches!(
            parse_admin_level(Some(&json!(null))),
            Err(ValidationError::InvalidStockValue(_))
        ));
    }

    #[test]
    fn test_parse_strict_level() {
        assert!((parse_strict_level(" 12 ").unwrap() - 12.0).abs() < f64::EPSILON);
        assert!(parse_strict_level("0").is_ok());
        assert!(parse_strict_level("-1").is_err());
        assert!(parse_strict_level("NaN").is_err());
        assert!(parse_strict_level("inf").is_err());
        assert!(parse_strict_level("ten").is_err());
        assert!(parse_strict_level("").is_err());
    }
}
