//! Dropzone Core - stock and checkout logic shared by every front end.
//!
//! Dropzone is a storefront fixture for exercising automated purchase bots:
//! one stock counter, a buy button, and a checkout form that validates card
//! details without charging anything.
//!
//! # Architecture
//!
//! The core crate contains only types, traits, and pure logic - no network
//! and no file access. The front ends plug in their own adapters:
//! - `storefront` - HTTP server over a [`MemoryStockStore`]
//! - `cli` - local commands over a file-backed store
//!
//! # Modules
//!
//! - [`stock`] - The [`StockStore`] capability and the in-memory store
//! - [`checkout`] - Card/expiry/CVC validation, masking, quantity parsing
//! - [`auth`] - The [`AdminAuthorizer`] capability
//! - [`flow`] - Purchase, checkout, and set-stock operations
//! - [`error`] - Error kinds surfaced to clients

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod checkout;
pub mod error;
pub mod flow;
pub mod stock;

pub use auth::{AdminAuthorizer, SharedSecretAuthorizer};
pub use checkout::{CheckoutRecord, CheckoutSubmission, ValidatedSubmission};
pub use error::{AuthError, FlowError, StockError, StoreError, ValidationError};
pub use flow::CheckoutReceipt;
pub use stock::{DEFAULT_STOCK, MemoryStockStore, StockStore};
