//! Error types for the stock and checkout flow.
//!
//! Every variant's `Display` text is the message surfaced to clients, so keep
//! them short and free of request data.

use thiserror::Error;

/// Storage backend failure.
///
/// Only persistent adapters produce this; the in-memory store never fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing storage could not be read or written.
    #[error("Stock storage unavailable: {0}")]
    Unavailable(String),
    /// The backing storage held a value that is not a stock level.
    #[error("Stock storage corrupt: {0}")]
    Corrupt(String),
}

/// Errors from reading or mutating the stock level.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StockError {
    /// Nothing left to sell.
    #[error("Out of stock")]
    OutOfStock,
    /// More units requested than are available.
    #[error("Insufficient stock: requested {requested}, only {available} left")]
    InsufficientStock {
        /// Units the caller asked for.
        requested: u32,
        /// Units available at the time of the request.
        available: u32,
    },
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Checkout and admin input validation failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more of name, card number, expiry, or CVC is empty.
    #[error("Missing required fields")]
    MissingFields,
    /// Card number has the wrong length or fails the Luhn check.
    #[error("Invalid card number")]
    InvalidCard,
    /// CVC is not 3 or 4 digits.
    #[error("Invalid CVC")]
    InvalidCvc,
    /// Expiry is not in `MM/YY` form.
    #[error("Invalid expiry date")]
    InvalidExpiry,
    /// Admin-supplied stock value is not a usable number.
    #[error("Invalid stock value: {0}")]
    InvalidStockValue(String),
}

/// Admin authorization failure.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Supplied key does not match the configured secret.
    #[error("Unauthorized")]
    Unauthorized,
}

/// Any failure of a purchase, checkout, or admin operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error(transparent)]
    Stock(#[from] StockError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<StoreError> for FlowError {
    fn from(err: StoreError) -> Self {
        Self::Stock(StockError::Store(err))
    }
}

impl FlowError {
    /// Stable machine-readable name of the failure kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Stock(StockError::OutOfStock) => "OutOfStock",
            Self::Stock(StockError::InsufficientStock { .. }) => "InsufficientStock",
            Self::Stock(StockError::Store(_)) => "StorageError",
            Self::Validation(ValidationError::MissingFields) => "MissingFields",
            Self::Validation(ValidationError::InvalidCard) => "InvalidCard",
            Self::Validation(ValidationError::InvalidCvc) => "InvalidCvc",
            Self::Validation(ValidationError::InvalidExpiry) => "InvalidExpiry",
            Self::Validation(ValidationError::InvalidStockValue(_)) => "InvalidStockValue",
            Self::Auth(AuthError::Unauthorized) => "Unauthorized",
        }
    }

    /// Whether the failure came from the storage backend rather than the caller.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Stock(StockError::Store(_)))
    }
}
