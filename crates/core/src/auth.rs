//! Admin authorization capability.
//!
//! Handlers only see [`AdminAuthorizer`]; the shared-secret check lives behind
//! it so a real credential scheme can replace it without touching routes.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::error::AuthError;

/// Decides whether a request-supplied key grants admin access.
pub trait AdminAuthorizer: Send + Sync {
    /// Authorize `key`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if the key is not accepted.
    fn authorize(&self, key: &str) -> Result<(), AuthError>;
}

/// Exact-match comparison against one configured secret.
///
/// No expiry, no rotation, no per-user identity.
pub struct SharedSecretAuthorizer {
    secret: SecretString,
}

impl SharedSecretAuthorizer {
    /// Create an authorizer for `secret`.
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }
}

impl fmt::Debug for SharedSecretAuthorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecretAuthorizer")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl AdminAuthorizer for SharedSecretAuthorizer {
    fn authorize(&self, key: &str) -> Result<(), AuthError> {
        if key == self.secret.expose_secret() {
            Ok(())
        } else {
            Err(AuthError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authorizer() -> SharedSecretAuthorizer {
        SharedSecretAuthorizer::new(SecretString::from("s3cret-key"))
    }

    #[test]
    fn test_exact_match_is_authorized() {
        assert_eq!(authorizer().authorize("s3cret-key"), Ok(()));
    }

    #[test]
    fn test_mismatch_is_unauthorized() {
        let auth = authorizer();
        for key in ["", "s3cret", "s3cret-key ", "S3CRET-KEY"] {
            assert_eq!(auth.authorize(key), Err(AuthError::Unauthorized));
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", authorizer());
        assert!(!debug.contains("s3cret-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
