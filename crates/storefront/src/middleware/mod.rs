//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`)
//! 2. `TraceLayer` (request span with an empty `request_id` field)
//! 3. Request ID (fills the span field, echoes `x-request-id`)
//! 4. CSP nonce (per-request nonce for the inline page scripts)
//! 5. Security headers (CSP built from the nonce, isolation headers)
//!
//! No rate limiting is applied; purchase bots are expected to hammer every
//! endpoint.

pub mod csp;
pub mod request_id;
pub mod security_headers;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
