//! Unified error handling with Sentry integration.
//!
//! API handlers return `Result<T, AppError>`. Every error renders as the JSON
//! envelope `{"ok": false, "kind": ..., "message": ...}` so bots never have to
//! parse a plain-text rejection. Server-side failures are captured to Sentry before
//! responding.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dropzone_core::{FlowError, StockError};
use serde::Serialize;
use thiserror::Error;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Purchase, checkout, or admin operation rejected.
    #[error(transparent)]
    Flow(#[from] FlowError),

    /// Request body could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Failure body shared by every API endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub kind: &'static str,
    pub message: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Flow(FlowError::Auth(_)) => StatusCode::UNAUTHORIZED,
            Self::Flow(FlowError::Stock(StockError::Store(_))) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Flow(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Machine-readable failure kind, e.g. `OutOfStock` or `InvalidCard`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Flow(err) => err.kind(),
            Self::BadRequest(_) => "BadRequest",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(ErrorBody {
                ok: false,
                kind: self.kind(),
                message,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use dropzone_core::{AuthError, StoreError, ValidationError};

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(FlowError::from(StockError::OutOfStock));
        assert_eq!(err.to_string(), "Out of stock");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_kind() {
        assert_eq!(
            AppError::from(FlowError::from(ValidationError::InvalidExpiry)).kind(),
            "InvalidExpiry"
        );
        assert_eq!(
            AppError::from(FlowError::from(AuthError::Unauthorized)).kind(),
            "Unauthorized"
        );
        assert_eq!(AppError::BadRequest("eof".to_string()).kind(), "BadRequest");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(FlowError::from(AuthError::Unauthorized).into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(FlowError::from(ValidationError::InvalidCard).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(
                FlowError::from(StockError::InsufficientStock {
                    requested: 2,
                    available: 1
                })
                .into()
            ),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(FlowError::from(StoreError::Unavailable("x".to_string())).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
    }
}
