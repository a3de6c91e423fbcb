//! Listing types for the Storefront API.
//!
//! Full products, variants and options live in `shopfront_core` because the
//! variant resolver and cart consume them. The types here only describe
//! catalog listings (collections, product cards).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{Image, Money, ProductId, VariantId};

use super::ShopifyError;

/// Handle of the synthetic collection that lists every collection.
pub const ALL_COLLECTIONS_HANDLE: &str = "all";

// =============================================================================
// Product Listing Types
// =============================================================================

/// First variant of a listed product, enough to add it straight to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSummary {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title.
    pub title: String,
    /// Whether this variant is available for sale.
    pub available_for_sale: bool,
    /// Current price.
    pub price: Money,
}

/// A product card in a collection, search result or featured list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product ID.
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// Whether any variant is available.
    pub available_for_sale: bool,
    /// Lowest variant price.
    pub min_price: Money,
    /// First product image.
    pub featured_image: Option<Image>,
    /// First variant.
    pub first_variant: Option<VariantSummary>,
}

// =============================================================================
// Collection Types
// =============================================================================

/// A collection in the collection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    /// Collection ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// Collection image.
    pub image: Option<Image>,
}

/// A collection with its products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// Collection image.
    pub image: Option<Image>,
    /// Products in this collection.
    pub products: Vec<ProductSummary>,
}

/// What a collection handle resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectionPage {
    /// A regular collection.
    Collection(Collection),
    /// The `all` handle: every collection, without products.
    AllCollections {
        /// Fixed id of the synthetic collection.
        id: String,
        /// Display title.
        title: String,
        /// Display description.
        description: String,
        /// Every collection in the store.
        collections: Vec<CollectionSummary>,
    },
}

impl CollectionPage {
    /// Build the synthetic `all` page.
    #[must_use]
    pub fn all_collections(collections: Vec<CollectionSummary>) -> Self {
        Self::AllCollections {
            id: "all-collections".to_string(),
            title: "All Collections".to_string(),
            description: "Browse all collections in our store".to_string(),
            collections,
        }
    }
}

// =============================================================================
// Filter Types
// =============================================================================

/// Sort keys for products within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCollectionSortKey {
    /// Merchant-defined collection order.
    #[default]
    CollectionDefault,
    /// Best selling first.
    BestSelling,
    /// Newest first (with `reverse`).
    Created,
    /// By product id.
    Id,
    /// Manual order.
    Manual,
    /// By price.
    Price,
    /// By search relevance.
    Relevance,
    /// Alphabetical.
    Title,
}

/// Filters and sort order for a collection's products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollectionFilters {
    /// Minimum variant price.
    pub price_min: Option<Decimal>,
    /// Maximum variant price.
    pub price_max: Option<Decimal>,
    /// Sort key.
    #[serde(default)]
    pub sort_key: ProductCollectionSortKey,
    /// Reverse the sort order.
    #[serde(default)]
    pub reverse: bool,
}

impl CollectionFilters {
    /// Whether a price range is set on either end.
    #[must_use]
    pub const fn has_price_range(&self) -> bool {
        self.price_min.is_some() || self.price_max.is_some()
    }

    /// Reject a price range whose minimum is above its maximum.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::InvalidInput` when `price_min > price_max`.
    pub fn validate(&self) -> Result<(), ShopifyError> {
        match (self.price_min, self.price_max) {
            (Some(min), Some(max)) if min > max => Err(ShopifyError::InvalidInput(format!(
                "price_min ({min}) is greater than price_max ({max})"
            ))),
            _ => Ok(()),
        }
    }
}
