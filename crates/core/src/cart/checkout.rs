//! Checkout hand-off types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Quantity, VariantId};

/// One entry of the checkout payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLineInput {
    /// Variant to purchase.
    pub variant_id: VariantId,
    /// Number of units.
    pub quantity: Quantity,
}

/// A created checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    /// Checkout id assigned by the platform.
    pub id: String,
    /// URL the shopper is sent to for payment.
    pub web_url: String,
}

/// Why a checkout submission failed.
///
/// Every variant lands the cart in its rejected state; the display string is
/// what the cart records as its error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// The platform rejected the request content (e.g., an out-of-stock variant).
    #[error("{0}")]
    Validation(String),

    /// The request could not complete or its response could not be understood.
    #[error("Failed to create checkout: {0}")]
    Network(String),

    /// The request did not finish in time.
    #[error("Checkout timed out after {0:?}")]
    Timeout(Duration),
}
