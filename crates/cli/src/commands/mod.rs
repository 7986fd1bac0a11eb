//! CLI command implementations.
//!
//! Each command writes its user-facing result to `out` and its diagnostics to
//! the tracing subscriber (stderr), mirroring how the storefront page shows a
//! message while the server logs the purchase.

pub mod checkout;
pub mod inventory;

use dropzone_core::{FlowError, StoreError, ValidationError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Purchase, checkout, or stock operation rejected.
    #[error(transparent)]
    Flow(#[from] FlowError),

    /// Writing the result failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        Self::Flow(err.into())
    }
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        Self::Flow(err.into())
    }
}

impl CommandError {
    /// Process exit code for this error.
    ///
    /// `1` for rejected requests, `2` for storage or output failures.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Flow(err) if !err.is_storage() => 1,
            Self::Flow(_) | Self::Output(_) => 2,
        }
    }
}
