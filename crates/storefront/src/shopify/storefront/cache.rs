//! Cache types for Storefront API responses.

use shopfront_core::Product;

use crate::shopify::types::{CollectionPage, CollectionSummary, ProductSummary};

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<ProductSummary>),
    Collection(Box<CollectionPage>),
    Collections(Vec<CollectionSummary>),
}
