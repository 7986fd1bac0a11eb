//! Application state shared across handlers.

use std::sync::Arc;

use dropzone_core::{AdminAuthorizer, MemoryStockStore, SharedSecretAuthorizer, StockStore};

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The stock store and admin
/// authorizer are trait objects so tests can inject their own.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    stock: Box<dyn StockStore>,
    authorizer: Box<dyn AdminAuthorizer>,
}

impl AppState {
    /// Create application state with explicit adapters.
    pub fn new(
        config: StorefrontConfig,
        stock: impl StockStore + 'static,
        authorizer: impl AdminAuthorizer + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                stock: Box::new(stock),
                authorizer: Box::new(authorizer),
            }),
        }
    }

    /// Create application state with an in-memory store seeded from
    /// `config.initial_stock` and the configured shared-secret authorizer.
    #[must_use]
    pub fn from_config(config: StorefrontConfig) -> Self {
        let stock = MemoryStockStore::new(config.initial_stock);
        let authorizer = SharedSecretAuthorizer::new(config.admin_key.clone());
        Self::new(config, stock, authorizer)
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the stock store.
    #[must_use]
    pub fn stock(&self) -> &dyn StockStore {
        self.inner.stock.as_ref()
    }

    /// Get a reference to the admin authorizer.
    #[must_use]
    pub fn authorizer(&self) -> &dyn AdminAuthorizer {
        self.inner.authorizer.as_ref()
    }
}
