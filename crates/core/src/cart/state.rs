//! Cart state and its persisted record.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::checkout::CheckoutLineInput;
use super::line_item::LineItem;
use crate::types::{CurrencyCode, VariantId};

/// Snapshot of the cart.
///
/// Only [`CartStore`](super::CartStore) can change one; everyone else reads
/// it through the accessors below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub(super) items: Vec<LineItem>,
    pub(super) checkout_url: Option<String>,
    pub(super) loading: bool,
    pub(super) error: Option<String>,
}

impl CartState {
    /// Line items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// External checkout URL from the last successful checkout.
    #[must_use]
    pub fn checkout_url(&self) -> Option<&str> {
        self.checkout_url.as_deref()
    }

    /// Whether a checkout submission is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message from the last failed checkout.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line item by variant id.
    #[must_use]
    pub fn item(&self, id: &VariantId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Sum of `price × quantity` over all items.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Display currency: the first item's currency, or USD for an empty cart.
    ///
    /// Mixed-currency carts are not converted; see
    /// [`has_mixed_currencies`](Self::has_mixed_currencies).
    #[must_use]
    pub fn currency_code(&self) -> CurrencyCode {
        self.items
            .first()
            .map(|item| item.currency_code.clone())
            .unwrap_or_default()
    }

    /// Whether items are priced in more than one currency.
    #[must_use]
    pub fn has_mixed_currencies(&self) -> bool {
        self.items
            .split_first()
            .is_some_and(|(first, rest)| rest.iter().any(|i| i.currency_code != first.currency_code))
    }

    /// Checkout payload: one entry per item, in item order.
    #[must_use]
    pub fn checkout_lines(&self) -> Vec<CheckoutLineInput> {
        self.items
            .iter()
            .map(|item| CheckoutLineInput {
                variant_id: item.id.clone(),
                quantity: item.quantity,
            })
            .collect()
    }

    /// Rebuild a state from a persisted record.
    ///
    /// Duplicate variant ids are merged so the one-entry-per-variant
    /// invariant holds even for hand-edited records. `loading` and `error`
    /// always start cleared.
    #[must_use]
    pub fn from_persisted(record: PersistedCart) -> Self {
        let mut items: Vec<LineItem> = Vec::with_capacity(record.items.len());
        let mut positions: HashMap<VariantId, usize> = HashMap::new();

        for item in record.items {
            if let Some(existing) = positions.get(&item.id).and_then(|&i| items.get_mut(i)) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                positions.insert(item.id.clone(), items.len());
                items.push(item);
            }
        }

        Self {
            items,
            checkout_url: record.checkout_url,
            loading: false,
            error: None,
        }
    }
}

/// The durable part of a cart: `{items, checkoutUrl}`.
///
/// Versionless; a record that no longer deserializes is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCart {
    /// Line items in insertion order.
    pub items: Vec<LineItem>,
    /// Checkout URL from the last successful checkout.
    #[serde(default)]
    pub checkout_url: Option<String>,
}

impl From<&CartState> for PersistedCart {
    fn from(state: &CartState) -> Self {
        Self {
            items: state.items.clone(),
            checkout_url: state.checkout_url.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{ProductId, Quantity};

    fn item(id: &str, price: i64, qty: u32, currency: &str) -> LineItem {
        LineItem {
            id: VariantId::parse(id).unwrap(),
            product_id: ProductId::parse("p").unwrap(),
            title: "Thing".to_string(),
            variant_title: None,
            handle: "thing".to_string(),
            price: Decimal::new(price, 2),
            currency_code: CurrencyCode::parse(currency).unwrap(),
            image_url: String::new(),
            quantity: Quantity::new(qty).unwrap(),
        }
    }

    #[test]
    fn test_derived_totals() {
        let state = CartState {
            items: vec![item("a", 1000, 2, "USD"), item("b", 250, 3, "USD")],
            ..CartState::default()
        };
        assert_eq!(state.subtotal(), Decimal::new(2750, 2));
        assert_eq!(state.item_count(), 5);
        assert_eq!(state.currency_code().as_str(), "USD");
        assert!(!state.has_mixed_currencies());
    }

    #[test]
    fn test_empty_cart_defaults_to_usd() {
        let state = CartState::default();
        assert_eq!(state.currency_code(), CurrencyCode::usd());
        assert_eq!(state.subtotal(), Decimal::ZERO);
        assert_eq!(state.item_count(), 0);
    }

    #[test]
    fn test_first_item_currency_wins() {
        let state = CartState {
            items: vec![item("a", 100, 1, "EUR"), item("b", 100, 1, "USD")],
            ..CartState::default()
        };
        assert_eq!(state.currency_code().as_str(), "EUR");
        assert!(state.has_mixed_currencies());
    }

    #[test]
    fn test_from_persisted_merges_duplicates() {
        let record = PersistedCart {
            items: vec![
                item("a", 100, 1, "USD"),
                item("b", 100, 2, "USD"),
                item("a", 100, 4, "USD"),
            ],
            checkout_url: Some("https://x/checkout".to_string()),
        };
        let state = CartState::from_persisted(record);
        assert_eq!(state.items().len(), 2);
        assert_eq!(state.items()[0].id.as_str(), "a");
        assert_eq!(state.items()[0].quantity.get(), 5);
        assert_eq!(state.checkout_url(), Some("https://x/checkout"));
        assert!(!state.is_loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_persisted_record_shape() {
        let json = serde_json::to_value(PersistedCart::default()).unwrap();
        assert_eq!(json, serde_json::json!({"items": [], "checkoutUrl": null}));
    }

    #[test]
    fn test_missing_checkout_url_defaults_to_none() {
        let record: PersistedCart = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert_eq!(record.checkout_url, None);
    }
}
