//! Cart commands.
//!
//! Operate on the cart file in `SHOPFRONT_CART_DIR`. Each command loads the
//! file, applies one change and writes it back. A running storefront server
//! owns that file: it reads it once at startup and rewrites it on every cart
//! change, so edits made here while it runs are overwritten.

use shopfront_core::{CartAction, CartState, OptionSelection, VariantId};
use shopfront_storefront::config::CartConfig;
use shopfront_storefront::routes::cart::CartView;
use shopfront_storefront::state::AppState;

use super::{print_json, storefront_client};

/// Load the persisted cart behind a live Storefront client.
fn load_state() -> Result<AppState, Box<dyn std::error::Error>> {
    let client = storefront_client()?;
    let config = CartConfig::from_env()?;

    tracing::debug!(cart_dir = %config.storage_dir.display(), "Loading cart");
    Ok(AppState::new(client, &config))
}

fn print_cart(cart: CartState) -> Result<(), serde_json::Error> {
    print_json(&CartView::from(cart))
}

/// Print the cart with totals.
pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let state = load_state()?;
    print_cart(state.cart().snapshot().await)?;
    Ok(())
}

/// Resolve a product variant and add it to the cart.
pub async fn add(
    handle: &str,
    options: &OptionSelection,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = load_state()?;
    let item = state.line_item_for(handle, options, quantity).await?;

    tracing::info!(
        variant_id = %item.id,
        quantity = item.quantity.get(),
        "Adding to cart"
    );
    print_cart(state.cart().dispatch(CartAction::Add(item)).await?)?;
    Ok(())
}

/// Set the quantity of a cart item.
pub async fn update(variant_id: &str, quantity: u32) -> Result<(), Box<dyn std::error::Error>> {
    let id = VariantId::parse(variant_id)?;
    let state = load_state()?;

    print_cart(
        state
            .cart()
            .dispatch(CartAction::Update { id, quantity })
            .await?,
    )?;
    Ok(())
}

/// Remove an item from the cart.
pub async fn remove(variant_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = VariantId::parse(variant_id)?;
    let state = load_state()?;

    print_cart(state.cart().dispatch(CartAction::Remove(id)).await?)?;
    Ok(())
}

/// Empty the cart.
pub async fn clear() -> Result<(), Box<dyn std::error::Error>> {
    let state = load_state()?;
    print_cart(state.cart().dispatch(CartAction::Clear).await?)?;
    Ok(())
}

/// Create a checkout for the cart.
///
/// A rejected submission is printed like any other cart state, then
/// reported as a failure so scripts see a non-zero exit.
pub async fn checkout() -> Result<(), Box<dyn std::error::Error>> {
    let state = load_state()?;
    let cart = state.cart().checkout().await?;

    let error = cart.error().map(ToString::to_string);
    if let Some(url) = cart.checkout_url() {
        tracing::info!(checkout_url = url, "Checkout ready");
    }
    print_cart(cart)?;

    match error {
        Some(message) => Err(message.into()),
        None => Ok(()),
    }
}
