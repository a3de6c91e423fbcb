//! Variant resolution: from selected option values to a purchasable variant.
//!
//! A product page starts on the first available variant, copies its option
//! values into the selection, and re-resolves every time the shopper picks a
//! different value. Picks that match no variant keep the previous variant
//! rather than leaving the page without one.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{Product, ProductVariant};

/// Option name to selected value.
pub type OptionSelection = BTreeMap<String, String>;

/// First variant that agrees with `selection` on every option it names.
///
/// Options the variant carries but the selection does not name are ignored,
/// so an empty selection matches the first variant.
#[must_use]
pub fn find_variant<'a>(
    variants: &'a [ProductVariant],
    selection: &OptionSelection,
) -> Option<&'a ProductVariant> {
    variants.iter().find(|variant| matches_selection(variant, selection))
}

fn matches_selection(variant: &ProductVariant, selection: &OptionSelection) -> bool {
    selection
        .iter()
        .all(|(name, value)| variant.has_option(name, value))
}

/// The variant a product page opens on: the first available one, else the first.
#[must_use]
pub fn default_variant(variants: &[ProductVariant]) -> Option<&ProductVariant> {
    variants
        .iter()
        .find(|v| v.available_for_sale)
        .or_else(|| variants.first())
}

/// Whether some available variant carries `{name, value}`.
#[must_use]
pub fn has_available_variant(variants: &[ProductVariant], name: &str, value: &str) -> bool {
    variants
        .iter()
        .any(|v| v.available_for_sale && v.has_option(name, value))
}

/// Every `{name, value}` pair of `variant` as a selection.
#[must_use]
pub fn selection_of(variant: &ProductVariant) -> OptionSelection {
    variant
        .selected_options
        .iter()
        .map(|o| (o.name.clone(), o.value.clone()))
        .collect()
}

/// Render state of one option value button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionValueState {
    /// The value.
    pub value: String,
    /// Whether the value is part of the current selection.
    pub selected: bool,
    /// Whether some available variant carries it; unavailable values are disabled.
    pub available: bool,
}

/// Render state of one product option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionState {
    /// Option name.
    pub name: String,
    /// Values in product order.
    pub values: Vec<OptionValueState>,
}

/// Selection state for one product page.
#[derive(Debug, Clone)]
pub struct VariantSelector<'a> {
    product: &'a Product,
    selection: OptionSelection,
    resolved: Option<&'a ProductVariant>,
}

impl<'a> VariantSelector<'a> {
    /// Start on the product's default variant.
    #[must_use]
    pub fn new(product: &'a Product) -> Self {
        let resolved = default_variant(&product.variants);
        let selection = resolved.map(selection_of).unwrap_or_default();
        Self {
            product,
            selection,
            resolved,
        }
    }

    /// The product being configured.
    #[must_use]
    pub const fn product(&self) -> &'a Product {
        self.product
    }

    /// Current option selection.
    #[must_use]
    pub const fn selection(&self) -> &OptionSelection {
        &self.selection
    }

    /// Currently resolved variant (`None` only for a product without variants).
    #[must_use]
    pub const fn selected_variant(&self) -> Option<&'a ProductVariant> {
        self.resolved
    }

    /// Pick `value` for option `name`.
    ///
    /// Values no available variant carries are disabled, so picking one is a
    /// no-op and returns `false`. Otherwise the selection is updated and the
    /// variant re-resolved; if nothing matches the new combination exactly,
    /// the previously resolved variant is kept.
    pub fn select(&mut self, name: &str, value: &str) -> bool {
        if !has_available_variant(&self.product.variants, name, value) {
            return false;
        }

        self.selection.insert(name.to_owned(), value.to_owned());
        if let Some(variant) = find_variant(&self.product.variants, &self.selection) {
            self.resolved = Some(variant);
        }
        true
    }

    /// Apply several picks in the product's option order.
    ///
    /// Names the product does not define are ignored. Returns how many picks
    /// were accepted.
    pub fn select_all(&mut self, picks: &OptionSelection) -> usize {
        let product = self.product;
        product
            .options
            .iter()
            .filter_map(|option| picks.get(&option.name).map(|value| (&option.name, value)))
            .filter(|(name, value)| self.select(name, value))
            .count()
    }

    /// Render state for every option value of the product.
    #[must_use]
    pub fn option_states(&self) -> Vec<OptionState> {
        self.product
            .options
            .iter()
            .map(|option| OptionState {
                name: option.name.clone(),
                values: option
                    .values
                    .iter()
                    .map(|value| OptionValueState {
                        value: value.clone(),
                        selected: self.selection.get(&option.name) == Some(value),
                        available: has_available_variant(
                            &self.product.variants,
                            &option.name,
                            value,
                        ),
                    })
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{
        CurrencyCode, Money, PriceRange, ProductId, ProductOption, SelectedOption, VariantId,
    };

    fn variant(id: &str, available: bool, options: &[(&str, &str)]) -> ProductVariant {
        ProductVariant {
            id: VariantId::parse(id).unwrap(),
            title: options
                .iter()
                .map(|(_, v)| *v)
                .collect::<Vec<_>>()
                .join(" / "),
            available_for_sale: available,
            price: Money::new(Decimal::new(1000, 2), CurrencyCode::usd()),
            compare_at_price: None,
            selected_options: options
                .iter()
                .map(|(n, v)| SelectedOption::new(*n, *v))
                .collect(),
        }
    }

    fn product(options: &[(&str, &[&str])], variants: Vec<ProductVariant>) -> Product {
        Product {
            id: ProductId::parse("p").unwrap(),
            handle: "shirt".to_string(),
            title: "Shirt".to_string(),
            description: String::new(),
            description_html: String::new(),
            available_for_sale: variants.iter().any(|v| v.available_for_sale),
            product_type: String::new(),
            vendor: String::new(),
            price_range: PriceRange {
                min_variant_price: Money::zero(CurrencyCode::usd()),
                max_variant_price: Money::zero(CurrencyCode::usd()),
            },
            images: vec![],
            options: options
                .iter()
                .map(|(name, values)| ProductOption {
                    name: (*name).to_string(),
                    values: values.iter().map(|v| (*v).to_string()).collect(),
                })
                .collect(),
            variants,
        }
    }

    fn sizes() -> Product {
        product(
            &[("Size", &["S", "M", "L"])],
            vec![
                variant("a", true, &[("Size", "S")]),
                variant("b", true, &[("Size", "M")]),
            ],
        )
    }

    fn selection(pairs: &[(&str, &str)]) -> OptionSelection {
        pairs
            .iter()
            .map(|(n, v)| ((*n).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_find_variant_exact_match() {
        let p = sizes();
        let found = find_variant(&p.variants, &selection(&[("Size", "M")])).unwrap();
        assert_eq!(found.id.as_str(), "b");
        assert!(find_variant(&p.variants, &selection(&[("Size", "L")])).is_none());
    }

    #[test]
    fn test_find_variant_partial_selection_ignores_extra_options() {
        let p = product(
            &[("Size", &["S", "M"]), ("Color", &["Red", "Blue"])],
            vec![
                variant("s-red", true, &[("Size", "S"), ("Color", "Red")]),
                variant("m-blue", true, &[("Size", "M"), ("Color", "Blue")]),
            ],
        );
        let found = find_variant(&p.variants, &selection(&[("Color", "Blue")])).unwrap();
        assert_eq!(found.id.as_str(), "m-blue");
    }

    #[test]
    fn test_default_variant_prefers_available() {
        let variants = vec![
            variant("a", false, &[("Size", "S")]),
            variant("b", true, &[("Size", "M")]),
        ];
        assert_eq!(default_variant(&variants).unwrap().id.as_str(), "b");
    }

    #[test]
    fn test_default_variant_falls_back_to_first() {
        let variants = vec![
            variant("a", false, &[("Size", "S")]),
            variant("b", false, &[("Size", "M")]),
        ];
        assert_eq!(default_variant(&variants).unwrap().id.as_str(), "a");
        assert!(default_variant(&[]).is_none());
    }

    #[test]
    fn test_selector_initial_selection_copies_default_options() {
        let p = product(
            &[("Size", &["S", "M"]), ("Color", &["Red"])],
            vec![
                variant("a", false, &[("Size", "S"), ("Color", "Red")]),
                variant("b", true, &[("Size", "M"), ("Color", "Red")]),
            ],
        );
        let selector = VariantSelector::new(&p);
        assert_eq!(selector.selected_variant().unwrap().id.as_str(), "b");
        assert_eq!(
            selector.selection(),
            &selection(&[("Size", "M"), ("Color", "Red")])
        );
    }

    #[test]
    fn test_selector_resolves_new_selection() {
        let p = sizes();
        let mut selector = VariantSelector::new(&p);
        assert_eq!(selector.selected_variant().unwrap().id.as_str(), "a");

        assert!(selector.select("Size", "M"));
        assert_eq!(selector.selected_variant().unwrap().id.as_str(), "b");
    }

    #[test]
    fn test_selector_retains_previous_variant_without_match() {
        let p = product(
            &[("Size", &["S", "M"]), ("Color", &["Red", "Blue"])],
            vec![
                variant("s-red", true, &[("Size", "S"), ("Color", "Red")]),
                variant("m-blue", true, &[("Size", "M"), ("Color", "Blue")]),
            ],
        );
        let mut selector = VariantSelector::new(&p);
        assert_eq!(selector.selected_variant().unwrap().id.as_str(), "s-red");

        // {Size: M, Color: Red} does not exist; stay on s-red.
        assert!(selector.select("Size", "M"));
        assert_eq!(selector.selected_variant().unwrap().id.as_str(), "s-red");

        assert!(selector.select("Color", "Blue"));
        assert_eq!(selector.selected_variant().unwrap().id.as_str(), "m-blue");
    }

    #[test]
    fn test_selector_ignores_value_without_any_variant() {
        let p = sizes();
        let mut selector = VariantSelector::new(&p);
        selector.select("Size", "M");

        // "L" is a listed value but no variant carries it.
        assert!(!selector.select("Size", "L"));
        assert_eq!(selector.selected_variant().unwrap().id.as_str(), "b");
        assert_eq!(selector.selection(), &selection(&[("Size", "M")]));
    }

    #[test]
    fn test_selector_ignores_unavailable_value() {
        let p = product(
            &[("Size", &["S", "M"])],
            vec![
                variant("a", true, &[("Size", "S")]),
                variant("b", false, &[("Size", "M")]),
            ],
        );
        let mut selector = VariantSelector::new(&p);
        assert!(!selector.select("Size", "M"));
        assert_eq!(selector.selected_variant().unwrap().id.as_str(), "a");
    }

    #[test]
    fn test_has_available_variant() {
        let variants = vec![
            variant("a", true, &[("Size", "S")]),
            variant("b", false, &[("Size", "M")]),
        ];
        assert!(has_available_variant(&variants, "Size", "S"));
        assert!(!has_available_variant(&variants, "Size", "M"));
        assert!(!has_available_variant(&variants, "Size", "XL"));
        assert!(!has_available_variant(&variants, "Color", "S"));
    }

    #[test]
    fn test_option_states() {
        let p = product(
            &[("Size", &["S", "M", "L"])],
            vec![
                variant("a", true, &[("Size", "S")]),
                variant("b", false, &[("Size", "M")]),
            ],
        );
        let selector = VariantSelector::new(&p);
        let states = selector.option_states();
        assert_eq!(states.len(), 1);
        let values = &states[0].values;
        assert_eq!(
            values
                .iter()
                .map(|v| (v.value.as_str(), v.selected, v.available))
                .collect::<Vec<_>>(),
            [("S", true, true), ("M", false, false), ("L", false, false)]
        );
    }

    #[test]
    fn test_select_all_follows_product_option_order() {
        let p = product(
            &[("Size", &["S", "M"]), ("Color", &["Red", "Blue"])],
            vec![
                variant("s-red", true, &[("Size", "S"), ("Color", "Red")]),
                variant("m-blue", true, &[("Size", "M"), ("Color", "Blue")]),
            ],
        );
        let mut selector = VariantSelector::new(&p);
        let accepted = selector.select_all(&selection(&[
            ("Color", "Blue"),
            ("Size", "M"),
            ("Material", "Silk"),
        ]));
        assert_eq!(accepted, 2);
        assert_eq!(selector.selected_variant().unwrap().id.as_str(), "m-blue");
    }

    #[test]
    fn test_product_without_variants() {
        let p = product(&[], vec![]);
        let mut selector = VariantSelector::new(&p);
        assert!(selector.selected_variant().is_none());
        assert!(selector.selection().is_empty());
        assert!(!selector.select("Size", "M"));
    }
}
