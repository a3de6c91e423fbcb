//! CLI command implementations.

pub mod cart;
pub mod catalog;

use serde::Serialize;
use shopfront_storefront::config::{ConfigError, ShopifyStorefrontConfig};
use shopfront_storefront::shopify::StorefrontClient;

/// Build a Storefront API client from the environment.
fn storefront_client() -> Result<StorefrontClient, ConfigError> {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    let config = ShopifyStorefrontConfig::from_env()?;
    Ok(StorefrontClient::new(&config))
}

/// Print a value as pretty JSON on stdout.
#[allow(clippy::print_stdout)]
fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse an option pick written as `Name=Value`.
pub fn parse_option(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected Name=Value, got `{raw}`"))?;

    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return Err(format!("expected Name=Value, got `{raw}`"));
    }

    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option() {
        assert_eq!(
            parse_option("Size=M").unwrap(),
            ("Size".to_string(), "M".to_string())
        );
        assert_eq!(
            parse_option(" Color = Dusty Rose ").unwrap(),
            ("Color".to_string(), "Dusty Rose".to_string())
        );
    }

    #[test]
    fn test_parse_option_rejects_malformed() {
        assert!(parse_option("Size").is_err());
        assert!(parse_option("=M").is_err());
        assert!(parse_option("Size=").is_err());
    }
}
