//! Checkout submission.

use std::future::Future;

use shopfront_core::{Checkout, CheckoutError, CheckoutLineInput};

use crate::shopify::{ShopifyError, StorefrontClient};

/// Turns cart lines into a hosted checkout.
pub trait CheckoutSubmitter: Send + Sync {
    /// Create a checkout for `lines`.
    fn create_checkout(
        &self,
        lines: &[CheckoutLineInput],
    ) -> impl Future<Output = Result<Checkout, CheckoutError>> + Send;
}

impl CheckoutSubmitter for StorefrontClient {
    async fn create_checkout(
        &self,
        lines: &[CheckoutLineInput],
    ) -> Result<Checkout, CheckoutError> {
        Self::create_checkout(self, lines)
            .await
            .map_err(checkout_error)
    }
}

/// Shopify rejections of the request content are validation failures;
/// everything else is a transport failure.
fn checkout_error(err: ShopifyError) -> CheckoutError {
    match err {
        ShopifyError::UserError(message) | ShopifyError::InvalidInput(message) => {
            CheckoutError::Validation(message)
        }
        other => CheckoutError::Network(other.to_string()),
    }
}
