//! Security headers middleware.
//!
//! Pages are locked down to same-origin resources plus the per-request nonce
//! for the inline script and style blocks. The policy has no
//! `upgrade-insecure-requests` because the fixture is normally served over
//! plain HTTP on localhost.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use crate::middleware::CspNonce;

/// Add security headers to all responses.
///
/// Headers applied:
/// - `Content-Security-Policy` - see [`content_security_policy`]
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: no-referrer`
/// - `Cache-Control: no-store, max-age=0` - stock must never be served stale
/// - `Cross-Origin-Opener-Policy` / `Cross-Origin-Resource-Policy: same-origin`
/// - `Permissions-Policy` - payment, camera, microphone, geolocation denied
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let nonce = request.extensions().get::<CspNonce>().cloned();
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    if let Ok(value) = HeaderValue::from_str(&content_security_policy(nonce.as_ref())) {
        headers.insert(CONTENT_SECURITY_POLICY, value);
    }

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("camera=(), geolocation=(), microphone=(), payment=()"),
    );

    response
}

/// Build the CSP for a response.
///
/// Without a nonce, inline scripts and styles are not allowed at all.
#[must_use]
pub fn content_security_policy(nonce: Option<&CspNonce>) -> String {
    let inline = nonce.map(|n| format!(" {}", n.source())).unwrap_or_default();
    format!(
        "default-src 'none'; \
         script-src 'self'{inline}; \
         style-src 'self'{inline}; \
         img-src 'self'; \
         connect-src 'self'; \
         form-action 'self'; \
         base-uri 'none'; \
         frame-ancestors 'none'"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_includes_nonce() {
        let nonce = CspNonce("abc==".to_string());
        let csp = content_security_policy(Some(&nonce));
        assert!(csp.contains("script-src 'self' 'nonce-abc==';"));
        assert!(csp.contains("style-src 'self' 'nonce-abc==';"));
        assert!(csp.contains("connect-src 'self'"));
    }

    #[test]
    fn test_csp_without_nonce_blocks_inline() {
        let csp = content_security_policy(None);
        assert!(csp.contains("script-src 'self';"));
        assert!(!csp.contains("nonce-"));
    }
}
