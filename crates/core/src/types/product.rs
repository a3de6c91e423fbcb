//! Catalog product types.
//!
//! These are the read-only shapes the variant resolver and cart consume. The
//! `storefront` crate converts Storefront API responses into them.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, VariantId};
use super::price::Money;

/// Title Shopify gives the single variant of a product without options.
pub const DEFAULT_VARIANT_TITLE: &str = "Default Title";

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "Large", "Blue").
    pub value: String,
}

impl SelectedOption {
    /// Create a selected option pair.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Product option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Permissible values in display order (e.g., `["Small", "Medium", "Large"]`).
    pub values: Vec<String>,
}

/// Product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Image width in pixels.
    pub width: Option<u32>,
    /// Image height in pixels.
    pub height: Option<u32>,
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title (combination of option values).
    pub title: String,
    /// Whether this variant is available for sale.
    pub available_for_sale: bool,
    /// Current price.
    pub price: Money,
    /// Compare-at price (original price if on sale).
    pub compare_at_price: Option<Money>,
    /// Selected options for this variant, in product option order.
    pub selected_options: Vec<SelectedOption>,
}

impl ProductVariant {
    /// Value this variant carries for the named option, if any.
    #[must_use]
    pub fn option_value(&self, name: &str) -> Option<&str> {
        self.selected_options
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.value.as_str())
    }

    /// Whether this variant carries the `{name, value}` pair.
    #[must_use]
    pub fn has_option(&self, name: &str, value: &str) -> bool {
        self.option_value(name) == Some(value)
    }

    /// Title to show next to the product title, `None` for the default variant.
    #[must_use]
    pub fn display_title(&self) -> Option<&str> {
        (self.title != DEFAULT_VARIANT_TITLE).then_some(self.title.as_str())
    }
}

/// Price range for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Money,
    /// Maximum price among all variants.
    pub max_variant_price: Money,
}

/// A product in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// HTML description.
    pub description_html: String,
    /// Whether any variant is available.
    pub available_for_sale: bool,
    /// Product type/category.
    pub product_type: String,
    /// Vendor name.
    pub vendor: String,
    /// Price range across variants.
    pub price_range: PriceRange,
    /// Product images.
    pub images: Vec<Image>,
    /// Product options.
    pub options: Vec<ProductOption>,
    /// Product variants.
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Look up a variant by id.
    #[must_use]
    pub fn variant(&self, id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// URL of the first image, or an empty string.
    #[must_use]
    pub fn main_image_url(&self) -> &str {
        self.images.first().map_or("", |img| img.url.as_str())
    }
}
