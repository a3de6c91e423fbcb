//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - Hand-written GraphQL documents sent as `graphql_client::QueryBody`
//! - Shopify is source of truth - NO local sync, direct API calls
//! - In-memory caching via `moka` for catalog responses (5 minute TTL)
//!
//! # Operations
//!
//! - Collections: list, get by handle (with price filters and sorting)
//! - Products: get by handle, featured, search
//! - Checkout: create a checkout from cart lines
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::shopify::StorefrontClient;
//!
//! let client = StorefrontClient::new(&config.shopify);
//!
//! let product = client.get_product_by_handle("my-product").await?;
//! let results = client.search_products("shirt", 20).await?;
//! ```

mod storefront;
pub mod types;

pub use storefront::StorefrontClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify APIs.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// First part of the response body.
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response parsed but carried values the domain types reject.
    #[error("Invalid data in response: {0}")]
    InvalidData(String),

    /// Caller supplied an unusable argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
