//! Cart route handlers.
//!
//! Every handler answers with the full cart view so clients never need a
//! second request to refresh totals.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{CartAction, CartState, CurrencyCode, OptionSelection, VariantId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Cart state plus derived totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    #[serde(flatten)]
    pub state: CartState,
    pub subtotal: Decimal,
    pub item_count: u64,
    pub currency_code: CurrencyCode,
    pub has_mixed_currencies: bool,
}

impl From<CartState> for CartView {
    fn from(state: CartState) -> Self {
        Self {
            subtotal: state.subtotal(),
            item_count: state.item_count(),
            currency_code: state.currency_code(),
            has_mixed_currencies: state.has_mixed_currencies(),
            state,
        }
    }
}

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    /// Product handle.
    pub handle: String,
    /// Option picks; unset options keep the default variant's values.
    #[serde(default)]
    pub options: OptionSelection,
    /// Units to add.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Update-quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: u32,
}

fn parse_variant_id(raw: &str) -> Result<VariantId> {
    VariantId::parse(raw).map_err(|e| AppError::BadRequest(format!("Invalid variant id: {e}")))
}

/// Current cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(state.cart().snapshot().await.into())
}

/// Resolve the requested variant of a product and add it to the cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let item = state
        .line_item_for(&request.handle, &request.options, request.quantity)
        .await?;
    let cart = state.cart().dispatch(CartAction::Add(item)).await?;

    Ok(Json(cart.into()))
}

/// Set the quantity of a cart item.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(variant_id): Path<String>,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let id = parse_variant_id(&variant_id)?;
    let cart = state
        .cart()
        .dispatch(CartAction::Update {
            id,
            quantity: request.quantity,
        })
        .await?;
    Ok(Json(cart.into()))
}

/// Remove an item from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(variant_id): Path<String>,
) -> Result<Json<CartView>> {
    let id = parse_variant_id(&variant_id)?;
    let cart = state.cart().dispatch(CartAction::Remove(id)).await?;
    Ok(Json(cart.into()))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartView>> {
    let cart = state.cart().dispatch(CartAction::Clear).await?;
    Ok(Json(cart.into()))
}

/// Create a checkout for the cart.
///
/// A rejected submission still answers 200: the failure is in the cart's
/// `error` field, as the shopper sees it.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Result<Json<CartView>> {
    let cart = state.cart().checkout().await?;
    Ok(Json(cart.into()))
}
