//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CurrencyCode, Product, ProductId, ProductVariant, Quantity, VariantId};

/// Errors that can occur when building a [`LineItem`] from catalog data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineItemError {
    /// The variant does not belong to the product.
    #[error("variant {variant} does not belong to product {product}")]
    UnknownVariant {
        /// The product handle.
        product: String,
        /// The offending variant id.
        variant: VariantId,
    },
}

/// One purchasable entry in the cart.
///
/// Keyed by the variant id, not the product id: two sizes of the same shirt
/// are two line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Variant id (unique within a cart).
    pub id: VariantId,
    /// Owning product id.
    pub product_id: ProductId,
    /// Product title.
    pub title: String,
    /// Variant title, `None` for a product's single default variant.
    pub variant_title: Option<String>,
    /// Product URL handle.
    pub handle: String,
    /// Unit price.
    pub price: Decimal,
    /// ISO 4217 currency of `price`.
    pub currency_code: CurrencyCode,
    /// Display image URL (empty when the product has no images).
    pub image_url: String,
    /// Number of units.
    pub quantity: Quantity,
}

impl LineItem {
    /// Build a line item for `variant` of `product`.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::UnknownVariant`] if the variant is not one of
    /// the product's variants.
    pub fn from_variant(
        product: &Product,
        variant: &ProductVariant,
        quantity: Quantity,
    ) -> Result<Self, LineItemError> {
        if product.variant(&variant.id).is_none() {
            return Err(LineItemError::UnknownVariant {
                product: product.handle.clone(),
                variant: variant.id.clone(),
            });
        }

        Ok(Self {
            id: variant.id.clone(),
            product_id: product.id.clone(),
            title: product.title.clone(),
            variant_title: variant.display_title().map(str::to_owned),
            handle: product.handle.clone(),
            price: variant.price.amount,
            currency_code: variant.price.currency_code.clone(),
            image_url: product.main_image_url().to_owned(),
            quantity,
        })
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity.get())
    }
}
