//! Search route handler.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::shopify::ProductSummary;
use crate::state::AppState;

/// Results returned per search.
const SEARCH_RESULTS: u32 = 20;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub first: Option<u32>,
}

/// Search response.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub products: Vec<ProductSummary>,
}

/// Search products by free text.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults>> {
    let products = state
        .storefront()
        .search_products(&query.q, query.first.unwrap_or(SEARCH_RESULTS))
        .await?;

    Ok(Json(SearchResults {
        query: query.q.trim().to_string(),
        products,
    }))
}
