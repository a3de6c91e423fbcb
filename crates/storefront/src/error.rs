//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the response is built; clients get a JSON body
//! `{"error": "..."}` without internal details.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use shopfront_core::{CartError, LineItemError};
use thiserror::Error;

use crate::shopify::ShopifyError;

/// Application-level error type for the storefront API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Cart rejected the operation.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Catalog data could not become a line item.
    #[error("Line item error: {0}")]
    LineItem(#[from] LineItemError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Shopify(err) => match err {
                ShopifyError::NotFound(_) => StatusCode::NOT_FOUND,
                ShopifyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                ShopifyError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Cart(err) => match err {
                CartError::InvalidQuantity(_) | CartError::EmptyCart => StatusCode::BAD_REQUEST,
                CartError::CheckoutInProgress => StatusCode::CONFLICT,
            },
            Self::LineItem(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to clients.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Shopify(ShopifyError::NotFound(msg) | ShopifyError::InvalidInput(msg)) => {
                msg.clone()
            }
            Self::Shopify(ShopifyError::RateLimited(secs)) => {
                format!("Too many requests, retry after {secs} seconds")
            }
            Self::Shopify(_) => "External service error".to_string(),
            Self::Cart(err) => err.to_string(),
            Self::LineItem(err) => err.to_string(),
            Self::BadRequest(msg) => msg.clone(),
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

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
