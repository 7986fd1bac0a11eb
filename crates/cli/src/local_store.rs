//! File-backed stock store.
//!
//! The storage is a flat JSON object of string keys, shared with anything else
//! that wants to keep local state next to it. The stock level lives under
//! [`STOCK_KEY`]; a missing file or key means the store has never been written
//! and reads as the default level.
//!
//! Writes go to a sibling temp file and are renamed into place, so a crash
//! never leaves a truncated file. Mutations are serialized within one process
//! only; two CLI processes racing on the same file can lose an update.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use dropzone_core::stock::{check_available, clamp_level};
use dropzone_core::{StockError, StockStore, StoreError};
use serde_json::{Map, Value};

/// Key holding the stock level.
pub const STOCK_KEY: &str = "stock";

/// Stock store persisted in a local JSON key-value file.
#[derive(Debug)]
pub struct FileStockStore {
    path: PathBuf,
    default_level: u32,
    lock: Mutex<()>,
}

impl FileStockStore {
    /// Open (lazily) the store at `path`.
    ///
    /// Nothing is read or created until the first operation.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, default_level: u32) -> Self {
        Self {
            path: path.into(),
            default_level,
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the stock key so the level reverts to the default.
    ///
    /// Other keys in the file are kept.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read or written.
    pub fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.guard();
        let mut entries = self.load()?;
        if entries.remove(STOCK_KEY).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(unavailable(&self.path, &e)),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(StoreError::Corrupt(format!(
                "{} is not a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(StoreError::Corrupt(format!("{}: {e}", self.path.display()))),
        }
    }

    fn save(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| unavailable(parent, &e))?;
        }

        let body = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| unavailable(&tmp, &e))?;
        fs::rename(&tmp, &self.path).map_err(|e| unavailable(&self.path, &e))
    }

    fn level(&self, entries: &Map<String, Value>) -> Result<u32, StoreError> {
        match entries.get(STOCK_KEY) {
            None | Some(Value::Null) => Ok(self.default_level),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| StoreError::Corrupt(format!("{STOCK_KEY} holds {value}"))),
        }
    }
}

impl StockStore for FileStockStore {
    fn get(&self) -> Result<u32, StoreError> {
        let _guard = self.guard();
        let entries = self.load()?;
        self.level(&entries)
    }

    fn set(&self, level: f64) -> Result<u32, StoreError> {
        let _guard = self.guard();
        let mut entries = self.load()?;
        let level = clamp_level(level);
        entries.insert(STOCK_KEY.to_string(), Value::from(level));
        self.save(&entries)?;
        Ok(level)
    }

    fn decrement(&self, qty: u32) -> Result<u32, StockError> {
        let _guard = self.guard();
        let mut entries = self.load()?;
        let current = self.level(&entries)?;
        check_available(current, qty)?;

        let level = current - qty;
        entries.insert(STOCK_KEY.to_string(), Value::from(level));
        self.save(&entries)?;
        Ok(level)
    }
}

fn unavailable(path: &Path, err: &std::io::Error) -> StoreError {
    StoreError::Unavailable(format!("{}: {err}", path.display()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dropzone_core::DEFAULT_STOCK;

    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileStockStore {
        FileStockStore::new(dir.path().join("state/store.json"), DEFAULT_STOCK)
    }

    #[test]
    fn test_missing_file_reads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.get().unwrap(), DEFAULT_STOCK);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).set(12.0).unwrap(), 12);
        assert_eq!(store_in(&dir).get().unwrap(), 12);

        let raw: Value =
            serde_json::from_str(&fs::read_to_string(store_in(&dir).path()).unwrap()).unwrap();
        assert_eq!(raw["stock"], 12);
    }

    #[test]
    fn test_decrement_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set(5.0).unwrap();
        assert_eq!(store.decrement(2).unwrap(), 3);
        assert_eq!(store_in(&dir).get().unwrap(), 3);
    }

    #[test]
    fn test_decrement_failure_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set(1.0).unwrap();
        assert_eq!(
            store.decrement(2).unwrap_err(),
            StockError::InsufficientStock {
                requested: 2,
                available: 1
            }
        );
        store.set(0.0).unwrap();
        assert_eq!(store.decrement(1).unwrap_err(), StockError::OutOfStock);
        assert_eq!(store.get().unwrap(), 0);
    }

    #[test]
    fn test_clear_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"{"stock": 0, "theme": "dark"}"#,
        )
        .unwrap();

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), DEFAULT_STOCK);

        let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert!(raw.get(STOCK_KEY).is_none());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "[1, 2, 3]").unwrap();
        assert!(matches!(store.get(), Err(StoreError::Corrupt(_))));

        fs::write(store.path(), r#"{"stock": -3}"#).unwrap();
        assert!(matches!(store.get(), Err(StoreError::Corrupt(_))));
    }
}
