//! Collection route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use super::empty_string_as_none;
use crate::error::Result;
use crate::shopify::{CollectionFilters, CollectionPage, CollectionSummary, ProductCollectionSortKey};
use crate::state::AppState;

/// Collections returned by the listing.
const COLLECTIONS_PER_PAGE: u32 = 50;

/// Products returned per collection.
const PRODUCTS_PER_PAGE: u32 = 24;

/// Collection filter query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CollectionQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub price_min: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub price_max: Option<Decimal>,
    #[serde(default)]
    pub sort_key: Option<ProductCollectionSortKey>,
    #[serde(default)]
    pub reverse: Option<bool>,
    #[serde(default)]
    pub first: Option<u32>,
}

impl CollectionQuery {
    fn filters(&self) -> Result<CollectionFilters> {
        let filters = CollectionFilters {
            price_min: self.price_min,
            price_max: self.price_max,
            sort_key: self.sort_key.unwrap_or_default(),
            reverse: self.reverse.unwrap_or(false),
        };
        filters.validate()?;
        Ok(filters)
    }
}

/// Collection listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<CollectionSummary>>> {
    let collections = state
        .storefront()
        .get_collections(COLLECTIONS_PER_PAGE)
        .await?;
    Ok(Json(collections))
}

/// Collection detail with filtered, sorted products.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(query): Query<CollectionQuery>,
) -> Result<Json<CollectionPage>> {
    let filters = query.filters()?;
    let page = state
        .storefront()
        .get_collection_by_handle(&handle, &filters, query.first.unwrap_or(PRODUCTS_PER_PAGE))
        .await?;
    Ok(Json(page))
}
