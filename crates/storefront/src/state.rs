//! Application state shared across handlers.

use std::sync::Arc;

use shopfront_core::{CartStore, LineItem, OptionSelection, Quantity, VariantSelector};

use crate::cart::{CartPersistence, CartService, StorefrontCartService};
use crate::config::{CartConfig, StorefrontConfig};
use crate::error::AppError;
use crate::shopify::StorefrontClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the catalog client and the one cart.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    storefront: StorefrontClient,
    cart: StorefrontCartService,
}

impl AppState {
    /// Build state from validated configuration.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self::new(StorefrontClient::new(&config.shopify), &config.cart)
    }

    /// Build state around an existing client.
    ///
    /// The cart is read from `cart.storage_dir` once, here, and checks out
    /// through the same client. From then on this state owns the cart file
    /// and rewrites it on every change.
    #[must_use]
    pub fn new(storefront: StorefrontClient, cart: &CartConfig) -> Self {
        let store = CartStore::load(CartPersistence::in_dir(&cart.storage_dir));
        let cart = CartService::new(store, storefront.clone(), cart.checkout_timeout);

        Self {
            inner: Arc::new(AppStateInner { storefront, cart }),
        }
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn cart(&self) -> &StorefrontCartService {
        &self.inner.cart
    }

    /// Build the line item for `quantity` units of a product variant.
    ///
    /// The variant is resolved from the product's default variant with
    /// `options` applied on top. Unlike the product page, every pick must
    /// land: a sold-out value, an unknown option name or a combination no
    /// variant carries is rejected instead of falling back to the previous
    /// variant.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for a zero quantity, a product without variants,
    /// a pick that does not resolve or an unavailable variant, and `Shopify`
    /// if the product lookup fails.
    pub async fn line_item_for(
        &self,
        handle: &str,
        options: &OptionSelection,
        quantity: u32,
    ) -> Result<LineItem, AppError> {
        let quantity = Quantity::new(quantity).map_err(|e| AppError::BadRequest(e.to_string()))?;

        let product = self.storefront().get_product_by_handle(handle).await?;

        let mut selector = VariantSelector::new(&product);
        let accepted = selector.select_all(options);

        let variant = selector
            .selected_variant()
            .ok_or_else(|| AppError::BadRequest(format!("{} has no variants", product.title)))?;

        let resolved = accepted == options.len()
            && options
                .iter()
                .all(|(name, value)| variant.has_option(name, value));
        if !resolved {
            let picks = options
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(AppError::BadRequest(format!(
                "No available variant of {} matches {picks}",
                product.title
            )));
        }

        if !variant.available_for_sale {
            return Err(AppError::BadRequest(format!(
                "{} is not available for sale",
                variant.display_title().unwrap_or(&product.title)
            )));
        }

        Ok(LineItem::from_variant(&product, variant, quantity)?)
    }
}
