//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `DROPZONE_HOST` - Bind address (default: 127.0.0.1)
//! - `DROPZONE_PORT` - Listen port (default: 3000, falls back to `PORT`)
//! - `DROPZONE_ADMIN_KEY` - Shared secret for the admin surface
//! - `DROPZONE_INITIAL_STOCK` - Stock level at startup (default: 1)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//!
//! When `DROPZONE_ADMIN_KEY` is unset the well-known [`FALLBACK_ADMIN_KEY`] is
//! used and a warning is logged at startup. Anyone who knows the fallback can
//! reset the stock level.

use std::net::{IpAddr, SocketAddr};

use dropzone_core::DEFAULT_STOCK;
use secrecy::SecretString;
use thiserror::Error;

/// Admin key used when none is configured.
pub const FALLBACK_ADMIN_KEY: &str = "changeme-admin";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "3000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shared admin secret
    pub admin_key: SecretString,
    /// Whether `admin_key` is the built-in fallback
    pub admin_key_is_fallback: bool,
    /// Stock level the in-memory store starts with
    pub initial_stock: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("admin_key", &"[REDACTED]")
            .field("admin_key_is_fallback", &self.admin_key_is_fallback)
            .field("initial_stock", &self.initial_stock)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = parse_var("DROPZONE_HOST", get("DROPZONE_HOST"), DEFAULT_HOST)?;
        let (port_key, port_value) = get("DROPZONE_PORT").map_or_else(
            || ("PORT", get("PORT")),
            |value| ("DROPZONE_PORT", Some(value)),
        );
        let port = parse_var(port_key, port_value, DEFAULT_PORT)?;
        let initial_stock = parse_var(
            "DROPZONE_INITIAL_STOCK",
            get("DROPZONE_INITIAL_STOCK"),
            &DEFAULT_STOCK.to_string(),
        )?;

        let (admin_key, admin_key_is_fallback) = get("DROPZONE_ADMIN_KEY").map_or_else(
            || (SecretString::from(FALLBACK_ADMIN_KEY), true),
            |key| (SecretString::from(key), false),
        );

        Ok(Self {
            host,
            port,
            admin_key,
            admin_key_is_fallback,
            initial_stock,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, using `default` when it is unset.
fn parse_var<T>(key: &str, value: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .as_deref()
        .unwrap_or(default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
