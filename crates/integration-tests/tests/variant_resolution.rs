//! Integration tests for resolving option picks to a variant, and for
//! turning the resolved variant into a cart line.

use shopfront_core::{
    CartStore, EphemeralStorage, LineItem, LineItemError, OptionSelection, Quantity,
    VariantSelector,
};
use shopfront_integration_tests::{product, variant, vid};

/// a = S/Red, b = M/Red, c = L/Blue, d = M/Blue (sold out).
fn shirt() -> shopfront_core::Product {
    product(
        "linen-shirt",
        vec![
            variant("a", true, &[("Size", "S"), ("Color", "Red")]),
            variant("b", true, &[("Size", "M"), ("Color", "Red")]),
            variant("c", true, &[("Size", "L"), ("Color", "Blue")]),
            variant("d", false, &[("Size", "M"), ("Color", "Blue")]),
        ],
    )
}

fn picks(pairs: &[(&str, &str)]) -> OptionSelection {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect()
}

#[test]
fn test_opens_on_first_available_variant() {
    let product = shirt();
    let selector = VariantSelector::new(&product);

    assert_eq!(selector.selected_variant().unwrap().id, vid("a"));
    assert_eq!(selector.selection(), &picks(&[("Size", "S"), ("Color", "Red")]));
}

#[test]
fn test_sold_out_first_variant_is_skipped() {
    let product = product(
        "tee",
        vec![
            variant("x", false, &[("Size", "S")]),
            variant("y", true, &[("Size", "M")]),
        ],
    );
    let selector = VariantSelector::new(&product);

    assert_eq!(selector.selected_variant().unwrap().id, vid("y"));
}

#[test]
fn test_matching_pick_resolves_new_variant() {
    let product = shirt();
    let mut selector = VariantSelector::new(&product);

    assert!(selector.select("Size", "M"));
    assert_eq!(selector.selected_variant().unwrap().id, vid("b"));
}

#[test]
fn test_unmatched_combination_keeps_previous_variant() {
    let product = shirt();
    let mut selector = VariantSelector::new(&product);
    selector.select("Size", "M");

    // L only exists in Blue, so {Size: L, Color: Red} matches nothing.
    assert!(selector.select("Size", "L"));
    assert_eq!(selector.selected_variant().unwrap().id, vid("b"));
    assert_eq!(selector.selection().get("Size").map(String::as_str), Some("L"));
}

#[test]
fn test_select_all_follows_product_option_order() {
    let product = shirt();
    let mut selector = VariantSelector::new(&product);

    let applied = selector.select_all(&picks(&[("Color", "Blue"), ("Size", "L"), ("Fit", "Slim")]));

    assert_eq!(applied, 2);
    assert_eq!(selector.selected_variant().unwrap().id, vid("c"));
}

#[test]
fn test_option_states_flag_selection_and_availability() {
    let product = product(
        "tee",
        vec![
            variant("x", true, &[("Size", "S")]),
            variant("y", false, &[("Size", "XL")]),
        ],
    );
    let mut selector = VariantSelector::new(&product);

    assert!(!selector.select("Size", "XL"));

    let states = selector.option_states();
    let size = states.first().unwrap();
    let flags: Vec<(&str, bool, bool)> = size
        .values
        .iter()
        .map(|v| (v.value.as_str(), v.selected, v.available))
        .collect();

    assert_eq!(flags, [("S", true, true), ("XL", false, false)]);
}

#[test]
fn test_resolved_variant_becomes_cart_line() {
    let product = shirt();
    let mut selector = VariantSelector::new(&product);
    selector.select("Size", "M");
    let variant = selector.selected_variant().unwrap();

    let item = LineItem::from_variant(&product, variant, Quantity::new(2).unwrap()).unwrap();
    assert_eq!(item.id, vid("b"));
    assert_eq!(item.variant_title.as_deref(), Some("M / Red"));
    assert_eq!(item.handle, "linen-shirt");

    let mut cart = CartStore::load(EphemeralStorage);
    cart.add_to_cart(item.clone());
    cart.add_to_cart(item);
    assert_eq!(cart.state().item_count(), 4);
}

#[test]
fn test_foreign_variant_is_rejected() {
    let product = shirt();
    let stranger = variant("z", true, &[("Size", "S")]);

    let err = LineItem::from_variant(&product, &stranger, Quantity::new(1).unwrap()).unwrap_err();
    assert!(matches!(err, LineItemError::UnknownVariant { .. }));
}
