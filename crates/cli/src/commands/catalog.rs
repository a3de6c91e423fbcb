//! Catalog lookups against the Storefront API.

use clap::ValueEnum;
use rust_decimal::Decimal;
use shopfront_core::{OptionSelection, VariantSelector};
use shopfront_storefront::routes::products::{ProductPage, SelectionView};
use shopfront_storefront::routes::search::SearchResults;
use shopfront_storefront::shopify::{CollectionFilters, ProductCollectionSortKey, ShopifyError};

use super::{print_json, storefront_client};

/// Collection sort order as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    CollectionDefault,
    BestSelling,
    Created,
    Id,
    Manual,
    Price,
    Relevance,
    Title,
}

impl From<SortKey> for ProductCollectionSortKey {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::CollectionDefault => Self::CollectionDefault,
            SortKey::BestSelling => Self::BestSelling,
            SortKey::Created => Self::Created,
            SortKey::Id => Self::Id,
            SortKey::Manual => Self::Manual,
            SortKey::Price => Self::Price,
            SortKey::Relevance => Self::Relevance,
            SortKey::Title => Self::Title,
        }
    }
}

/// Assemble and validate collection filters from flags.
pub fn filters(
    price_min: Option<Decimal>,
    price_max: Option<Decimal>,
    sort_key: SortKey,
    reverse: bool,
) -> Result<CollectionFilters, ShopifyError> {
    let filters = CollectionFilters {
        price_min,
        price_max,
        sort_key: sort_key.into(),
        reverse,
    };
    filters.validate()?;
    Ok(filters)
}

/// Print the collection listing.
pub async fn list_collections(first: u32) -> Result<(), Box<dyn std::error::Error>> {
    let client = storefront_client()?;
    let collections = client.get_collections(first).await?;

    tracing::info!(count = collections.len(), "Fetched collections");
    print_json(&collections)?;
    Ok(())
}

/// Print one collection with its filtered products.
pub async fn show_collection(
    handle: &str,
    filters: &CollectionFilters,
    first: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = storefront_client()?;
    let page = client.get_collection_by_handle(handle, filters, first).await?;

    print_json(&page)?;
    Ok(())
}

/// Print a product with the variant resolved from `options`.
pub async fn show_product(
    handle: &str,
    options: &OptionSelection,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = storefront_client()?;
    let product = client.get_product_by_handle(handle).await?;

    let mut selector = VariantSelector::new(&product);
    let applied = selector.select_all(options);
    if applied < options.len() {
        tracing::warn!(
            requested = options.len(),
            applied,
            "Some option picks were unavailable and ignored"
        );
    }

    let selector = SelectionView::from(&selector);
    print_json(&ProductPage { product, selector })?;
    Ok(())
}

/// Print the featured products.
pub async fn featured(first: u32) -> Result<(), Box<dyn std::error::Error>> {
    let client = storefront_client()?;
    let products = client.get_featured_products(first).await?;

    print_json(&products)?;
    Ok(())
}

/// Print search results.
pub async fn search(query: &str, first: u32) -> Result<(), Box<dyn std::error::Error>> {
    let client = storefront_client()?;
    let products = client.search_products(query, first).await?;

    print_json(&SearchResults {
        query: query.trim().to_string(),
        products,
    })?;
    Ok(())
}
