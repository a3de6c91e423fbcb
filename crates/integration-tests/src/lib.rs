//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_engine` - Cart store mutations and derived totals
//! - `cart_persistence` - Carts surviving a restart through the file store
//! - `variant_resolution` - Option picks resolving to variants
//! - `checkout_lifecycle` - Checkout phases through the cart service
//!
//! None of the tests talk to Shopify; checkout outcomes come from scripted
//! submitters and catalog data from the fixtures below.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use rust_decimal::Decimal;
use shopfront_core::{
    CurrencyCode, LineItem, Money, PriceRange, Product, ProductId, ProductOption, ProductVariant,
    Quantity, SelectedOption, VariantId,
};

/// Parse a variant id.
#[must_use]
pub fn vid(id: &str) -> VariantId {
    VariantId::parse(id).unwrap()
}

/// A USD line item priced in cents.
#[must_use]
pub fn line_item(id: &str, cents: i64, quantity: u32) -> LineItem {
    LineItem {
        id: vid(id),
        product_id: ProductId::parse("gid://shopify/Product/1").unwrap(),
        title: "Linen Shirt".to_string(),
        variant_title: None,
        handle: "linen-shirt".to_string(),
        price: Decimal::new(cents, 2),
        currency_code: CurrencyCode::usd(),
        image_url: String::new(),
        quantity: Quantity::new(quantity).unwrap(),
    }
}

/// A variant with the given `{name, value}` options at 25.00 USD.
#[must_use]
pub fn variant(id: &str, available: bool, options: &[(&str, &str)]) -> ProductVariant {
    ProductVariant {
        id: vid(id),
        title: options
            .iter()
            .map(|(_, value)| *value)
            .collect::<Vec<_>>()
            .join(" / "),
        available_for_sale: available,
        price: Money::new(Decimal::new(2500, 2), CurrencyCode::usd()),
        compare_at_price: None,
        selected_options: options
            .iter()
            .map(|(name, value)| SelectedOption::new(*name, *value))
            .collect(),
    }
}

/// A product whose options are derived from its variants, in first-seen order.
#[must_use]
pub fn product(handle: &str, variants: Vec<ProductVariant>) -> Product {
    let mut options: Vec<ProductOption> = Vec::new();
    for selected in variants.iter().flat_map(|v| &v.selected_options) {
        match options.iter_mut().find(|o| o.name == selected.name) {
            Some(option) if option.values.contains(&selected.value) => {}
            Some(option) => option.values.push(selected.value.clone()),
            None => options.push(ProductOption {
                name: selected.name.clone(),
                values: vec![selected.value.clone()],
            }),
        }
    }

    let price = Money::new(Decimal::new(2500, 2), CurrencyCode::usd());
    Product {
        id: ProductId::parse("gid://shopify/Product/1").unwrap(),
        handle: handle.to_string(),
        title: "Linen Shirt".to_string(),
        description: String::new(),
        description_html: String::new(),
        available_for_sale: variants.iter().any(|v| v.available_for_sale),
        product_type: "Shirts".to_string(),
        vendor: "Shopfront".to_string(),
        price_range: PriceRange {
            min_variant_price: price.clone(),
            max_variant_price: price,
        },
        images: Vec::new(),
        options,
        variants,
    }
}
