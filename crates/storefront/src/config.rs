//! Storefront configuration loaded from environment variables.
//!
//! Configuration is read once at startup and validated; anything malformed
//! is a startup error rather than something corrected at runtime.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STOREFRONT_API_URL` - Storefront GraphQL endpoint
//!   (e.g., `https://your-store.myshopify.com/api/2025-01/graphql.json`)
//! - `SHOPIFY_STOREFRONT_ACCESS_TOKEN` - Storefront API public access token
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SHOPFRONT_CART_DIR` - Directory holding the persisted cart (default: .shopfront)
//! - `SHOPFRONT_CHECKOUT_TIMEOUT_SECS` - Checkout submission timeout (default: 15)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_ACCESS_TOKEN_LENGTH: usize = 20;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;
const DEFAULT_CHECKOUT_TIMEOUT_SECS: u64 = 15;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    /// Cart persistence and checkout configuration
    pub cart: CartConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Storefront GraphQL endpoint
    pub api_url: Url,
    /// Storefront API access token
    pub access_token: SecretString,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("api_url", &self.api_url.as_str())
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Cart persistence and checkout configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Directory holding the persisted cart slot
    pub storage_dir: PathBuf,
    /// Upper bound on a checkout submission
    pub checkout_timeout: Duration,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".shopfront"),
            checkout_timeout: Duration::from_secs(DEFAULT_CHECKOUT_TIMEOUT_SECS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            shopify: ShopifyStorefrontConfig::from_env()?,
            cart: CartConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyStorefrontConfig {
    /// Load the Shopify settings on their own (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if either variable is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = get_required_env("SHOPIFY_STOREFRONT_API_URL")?;
        let access_token = get_required_env("SHOPIFY_STOREFRONT_ACCESS_TOKEN")?;
        Self::new(&api_url, access_token)
    }

    /// Validate an endpoint URL and access token.
    ///
    /// # Errors
    ///
    /// - `InvalidEnvVar` if the URL is not an absolute `https` URL with a host
    /// - `InvalidEnvVar` if the token looks like a URL (the two values are
    ///   likely swapped; this is reported, never corrected)
    /// - `InsecureSecret` if the token is too short or a placeholder
    pub fn new(api_url: &str, access_token: String) -> Result<Self, ConfigError> {
        let api_url = validate_api_url(api_url, "SHOPIFY_STOREFRONT_API_URL")?;
        validate_access_token(&access_token, "SHOPIFY_STOREFRONT_ACCESS_TOKEN")?;
        Ok(Self {
            api_url,
            access_token: SecretString::from(access_token),
        })
    }

    /// Access token for the request header.
    #[must_use]
    pub fn token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

impl CartConfig {
    /// Load the cart settings on their own (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for a non-numeric or zero timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let storage_dir =
            get_optional_env("SHOPFRONT_CART_DIR").map_or(defaults.storage_dir, PathBuf::from);

        let checkout_timeout = match get_optional_env("SHOPFRONT_CHECKOUT_TIMEOUT_SECS") {
            None => defaults.checkout_timeout,
            Some(raw) => parse_timeout(&raw, "SHOPFRONT_CHECKOUT_TIMEOUT_SECS")?,
        };

        Ok(Self {
            storage_dir,
            checkout_timeout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a positive number of seconds.
fn parse_timeout(raw: &str, var_name: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string())),
    }
}

/// Parse and check the Storefront API endpoint.
fn validate_api_url(raw: &str, var_name: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if url.scheme() != "https" {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must use https (got {})", url.scheme()),
        ));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must include a host".to_string(),
        ));
    }

    Ok(url)
}

/// Check that an access token is plausible.
fn validate_access_token(token: &str, var_name: &str) -> Result<(), ConfigError> {
    if token.starts_with("http") || token.contains("://") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "looks like a URL; check that the API URL and access token are not swapped"
                .to_string(),
        ));
    }
    if token.len() < MIN_ACCESS_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_ACCESS_TOKEN_LENGTH} characters (got {})",
                token.len()
            ),
        ));
    }
    validate_secret_strength(token, var_name)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real tokens are random hex or base62)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
