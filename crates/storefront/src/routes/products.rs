//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shopfront_core::{OptionSelection, OptionState, Product, ProductVariant, VariantSelector};
use tracing::instrument;

use crate::error::Result;
use crate::shopify::ProductSummary;
use crate::state::AppState;

/// Products shown on the featured list by default.
const FEATURED_PRODUCTS: u32 = 8;

/// Featured list query parameters.
#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    pub first: Option<u32>,
}

/// Option picks sent by the product page.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub options: OptionSelection,
}

/// Selector state rendered next to a product.
#[derive(Debug, Serialize)]
pub struct SelectionView {
    /// Current option picks.
    pub selection: OptionSelection,
    /// Resolved variant, `None` only for products without variants.
    pub selected_variant: Option<ProductVariant>,
    /// Every option value with its selected/available flags.
    pub options: Vec<OptionState>,
}

impl From<&VariantSelector<'_>> for SelectionView {
    fn from(selector: &VariantSelector<'_>) -> Self {
        Self {
            selection: selector.selection().clone(),
            selected_variant: selector.selected_variant().cloned(),
            options: selector.option_states(),
        }
    }
}

/// Product detail response.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub product: Product,
    #[serde(flatten)]
    pub selector: SelectionView,
}

/// Featured products.
#[instrument(skip(state))]
pub async fn featured(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<Vec<ProductSummary>>> {
    let first = query.first.unwrap_or(FEATURED_PRODUCTS);
    let products = state.storefront().get_featured_products(first).await?;
    Ok(Json(products))
}

/// Product detail with the default variant selected.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<ProductPage>> {
    let product = state.storefront().get_product_by_handle(&handle).await?;
    let selector = SelectionView::from(&VariantSelector::new(&product));

    Ok(Json(ProductPage { product, selector }))
}

/// Resolve an option selection, starting from the default variant.
///
/// Picks for unavailable values are ignored; a combination no variant
/// matches keeps the previously resolved variant.
#[instrument(skip(state))]
pub async fn resolve_variant(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<SelectionView>> {
    let product = state.storefront().get_product_by_handle(&handle).await?;

    let mut selector = VariantSelector::new(&product);
    selector.select_all(&request.options);

    Ok(Json(SelectionView::from(&selector)))
}
