//! The cart store: exclusive owner of [`CartState`].

use std::sync::Arc;

use thiserror::Error;

use super::checkout::{Checkout, CheckoutError, CheckoutLineInput};
use super::line_item::LineItem;
use super::state::{CartState, PersistedCart};
use crate::types::{Quantity, VariantId};

/// Durable slot the store loads from at startup and writes after every mutation.
///
/// Implementations must not fail past this boundary: a failed load is
/// reported as `None`, a failed save is dropped.
pub trait CartStorage {
    /// Read the persisted cart, `None` if absent or unreadable.
    fn load(&self) -> Option<PersistedCart>;

    /// Write the persisted cart (best effort).
    fn save(&self, cart: &PersistedCart);
}

impl<T: CartStorage + ?Sized> CartStorage for Arc<T> {
    fn load(&self) -> Option<PersistedCart> {
        (**self).load()
    }

    fn save(&self, cart: &PersistedCart) {
        (**self).save(cart);
    }
}

/// Storage that keeps nothing; the cart lives only as long as its store.
#[derive(Debug, Clone, Copy, Default)]
pub struct EphemeralStorage;

impl CartStorage for EphemeralStorage {
    fn load(&self) -> Option<PersistedCart> {
        None
    }

    fn save(&self, _cart: &PersistedCart) {}
}

/// Errors returned by cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantities must be at least 1; use removal to drop an item.
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(u32),

    /// A checkout is already being submitted.
    #[error("a checkout is already in progress")]
    CheckoutInProgress,

    /// There is nothing to check out.
    #[error("cannot check out an empty cart")]
    EmptyCart,
}

/// Synchronous cart mutations, applied in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add an item, merging quantity into an existing entry for the same variant.
    Add(LineItem),
    /// Set the quantity of an existing entry.
    Update {
        /// Variant id of the entry.
        id: VariantId,
        /// New quantity (at least 1).
        quantity: u32,
    },
    /// Remove an entry.
    Remove(VariantId),
    /// Remove every entry and forget the checkout URL.
    Clear,
}

/// Owns the cart state and applies every change to it.
#[derive(Debug)]
pub struct CartStore<S> {
    state: CartState,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Create a store from whatever `storage` holds (empty if nothing usable).
    pub fn load(storage: S) -> Self {
        let state = storage
            .load()
            .map(CartState::from_persisted)
            .unwrap_or_default();
        Self { state, storage }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// The storage backing this store.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Apply a synchronous action.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for an update to quantity 0.
    pub fn dispatch(&mut self, action: CartAction) -> Result<(), CartError> {
        match action {
            CartAction::Add(item) => self.add_to_cart(item),
            CartAction::Update { id, quantity } => self.update_cart_item(&id, quantity)?,
            CartAction::Remove(id) => self.remove_from_cart(&id),
            CartAction::Clear => self.clear_cart(),
        }
        Ok(())
    }

    /// Add an item; an existing entry for the same variant grows by
    /// `item.quantity` instead of being duplicated.
    pub fn add_to_cart(&mut self, item: LineItem) {
        if let Some(existing) = self.state.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.state.items.push(item);
        }
        self.persist();
    }

    /// Set the quantity of the entry for `id`. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for `0`; state is left untouched.
    pub fn update_cart_item(&mut self, id: &VariantId, quantity: u32) -> Result<(), CartError> {
        let quantity = Quantity::new(quantity).map_err(|_| CartError::InvalidQuantity(quantity))?;
        if let Some(existing) = self.state.items.iter_mut().find(|i| &i.id == id) {
            existing.quantity = quantity;
        }
        self.persist();
        Ok(())
    }

    /// Remove the entry for `id`. Unknown ids are a no-op.
    pub fn remove_from_cart(&mut self, id: &VariantId) {
        self.state.items.retain(|i| &i.id != id);
        self.persist();
    }

    /// Empty the cart and forget the checkout URL.
    pub fn clear_cart(&mut self) {
        self.state.items.clear();
        self.state.checkout_url = None;
        self.persist();
    }

    /// Enter the pending phase of checkout.
    ///
    /// Sets `loading` and clears `error`, returning the payload to submit:
    /// one line per item, in item order.
    ///
    /// # Errors
    ///
    /// - [`CartError::CheckoutInProgress`] if a checkout is already loading
    /// - [`CartError::EmptyCart`] if there are no items
    pub fn begin_checkout(&mut self) -> Result<Vec<CheckoutLineInput>, CartError> {
        if self.state.loading {
            return Err(CartError::CheckoutInProgress);
        }
        if self.state.items.is_empty() {
            return Err(CartError::EmptyCart);
        }

        self.state.loading = true;
        self.state.error = None;
        Ok(self.state.checkout_lines())
    }

    /// Settle a checkout started with [`begin_checkout`](Self::begin_checkout).
    ///
    /// On success the checkout URL is recorded; on failure the error message
    /// is recorded and any earlier checkout URL is kept.
    pub fn complete_checkout(&mut self, outcome: Result<Checkout, CheckoutError>) {
        self.state.loading = false;
        match outcome {
            Ok(checkout) => {
                self.state.checkout_url = Some(checkout.web_url);
            }
            Err(err) => {
                self.state.error = Some(err.to_string());
            }
        }
        self.persist();
    }

    fn persist(&self) {
        self.storage.save(&PersistedCart::from(&self.state));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{CurrencyCode, ProductId};

    #[derive(Default)]
    struct RecordingStorage {
        initial: Option<PersistedCart>,
        saves: RefCell<Vec<PersistedCart>>,
    }

    impl CartStorage for RecordingStorage {
        fn load(&self) -> Option<PersistedCart> {
            self.initial.clone()
        }

        fn save(&self, cart: &PersistedCart) {
            self.saves.borrow_mut().push(cart.clone());
        }
    }

    fn item(id: &str, qty: u32) -> LineItem {
        LineItem {
            id: VariantId::parse(id).unwrap(),
            product_id: ProductId::parse("p").unwrap(),
            title: "Thing".to_string(),
            variant_title: Some("M".to_string()),
            handle: "thing".to_string(),
            price: Decimal::new(1000, 2),
            currency_code: CurrencyCode::usd(),
            image_url: String::new(),
            quantity: Quantity::new(qty).unwrap(),
        }
    }

    fn vid(id: &str) -> VariantId {
        VariantId::parse(id).unwrap()
    }

    fn store() -> CartStore<RecordingStorage> {
        CartStore::load(RecordingStorage::default())
    }

    #[test]
    fn test_add_merges_quantities() {
        let mut cart = store();
        cart.add_to_cart(item("v1", 2));
        cart.add_to_cart(item("v1", 3));

        assert_eq!(cart.state().items().len(), 1);
        assert_eq!(cart.state().items()[0].quantity.get(), 5);
    }

    #[test]
    fn test_distinct_ids_and_summed_quantities() {
        let mut cart = store();
        let adds = [("a", 1), ("b", 2), ("a", 4), ("c", 1), ("b", 1), ("a", 1)];
        let mut expected: HashMap<&str, u32> = HashMap::new();
        for (id, qty) in adds {
            cart.add_to_cart(item(id, qty));
            *expected.entry(id).or_default() += qty;
        }

        assert_eq!(cart.state().items().len(), expected.len());
        for line in cart.state().items() {
            assert_eq!(line.quantity.get(), expected[line.id.as_str()]);
        }
        let order: Vec<&str> = cart.state().items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn test_update_sets_quantity() {
        let mut cart = store();
        cart.add_to_cart(item("v1", 2));
        cart.update_cart_item(&vid("v1"), 7).unwrap();
        assert_eq!(cart.state().items()[0].quantity.get(), 7);
    }

    #[test]
    fn test_update_rejects_zero() {
        let mut cart = store();
        cart.add_to_cart(item("v1", 2));
        let saves_before = cart.storage().saves.borrow().len();

        assert_eq!(
            cart.update_cart_item(&vid("v1"), 0),
            Err(CartError::InvalidQuantity(0))
        );
        assert_eq!(cart.state().items()[0].quantity.get(), 2);
        assert_eq!(cart.storage().saves.borrow().len(), saves_before);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut cart = store();
        cart.add_to_cart(item("v1", 2));
        cart.update_cart_item(&vid("nope"), 9).unwrap();
        assert_eq!(cart.state().items().len(), 1);
        assert_eq!(cart.state().items()[0].quantity.get(), 2);
    }

    #[test]
    fn test_remove_leaves_others_and_is_idempotent() {
        let mut cart = store();
        cart.add_to_cart(item("v1", 1));
        cart.add_to_cart(item("v2", 1));

        cart.remove_from_cart(&vid("v1"));
        let ids: Vec<&str> = cart.state().items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["v2"]);

        let before = cart.state().clone();
        cart.remove_from_cart(&vid("v1"));
        assert_eq!(cart.state(), &before);
    }

    #[test]
    fn test_clear_empties_items_and_checkout_url() {
        let mut cart = store();
        cart.add_to_cart(item("v1", 1));
        cart.begin_checkout().unwrap();
        cart.complete_checkout(Ok(Checkout {
            id: "c1".to_string(),
            web_url: "https://x/checkout".to_string(),
        }));

        cart.clear_cart();
        assert!(cart.state().is_empty());
        assert_eq!(cart.state().checkout_url(), None);
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut cart = store();
        cart.add_to_cart(item("v1", 1));
        cart.update_cart_item(&vid("v1"), 3).unwrap();
        cart.add_to_cart(item("v2", 1));
        cart.remove_from_cart(&vid("v2"));
        cart.clear_cart();

        let saves = cart.storage().saves.borrow();
        assert_eq!(saves.len(), 5);
        assert_eq!(saves[1].items[0].quantity.get(), 3);
        assert_eq!(saves[4], PersistedCart::default());
    }

    #[test]
    fn test_load_restores_persisted_record() {
        let storage = RecordingStorage {
            initial: Some(PersistedCart {
                items: vec![item("v1", 2)],
                checkout_url: Some("https://x/checkout".to_string()),
            }),
            ..RecordingStorage::default()
        };
        let cart = CartStore::load(storage);
        assert_eq!(cart.state().items().len(), 1);
        assert_eq!(cart.state().checkout_url(), Some("https://x/checkout"));
        assert!(!cart.state().is_loading());
    }

    #[test]
    fn test_dispatch_applies_actions_in_order() {
        let mut cart = store();
        let actions = vec![
            CartAction::Add(item("v1", 1)),
            CartAction::Add(item("v2", 1)),
            CartAction::Update {
                id: vid("v2"),
                quantity: 4,
            },
            CartAction::Remove(vid("v1")),
        ];
        for action in actions {
            cart.dispatch(action).unwrap();
        }
        assert_eq!(cart.state().items().len(), 1);
        assert_eq!(cart.state().items()[0].quantity.get(), 4);

        assert_eq!(
            cart.dispatch(CartAction::Update {
                id: vid("v2"),
                quantity: 0
            }),
            Err(CartError::InvalidQuantity(0))
        );
        cart.dispatch(CartAction::Clear).unwrap();
        assert!(cart.state().is_empty());
    }

    #[test]
    fn test_begin_checkout_sets_loading_and_builds_payload() {
        let mut cart = store();
        cart.add_to_cart(item("v1", 2));
        cart.add_to_cart(item("v2", 1));

        let lines = cart.begin_checkout().unwrap();
        assert!(cart.state().is_loading());
        assert_eq!(cart.state().error(), None);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].variant_id.as_str(), "v1");
        assert_eq!(lines[0].quantity.get(), 2);
        assert_eq!(lines[1].variant_id.as_str(), "v2");
    }

    #[test]
    fn test_begin_checkout_is_single_flight() {
        let mut cart = store();
        cart.add_to_cart(item("v1", 1));
        cart.begin_checkout().unwrap();
        assert_eq!(cart.begin_checkout(), Err(CartError::CheckoutInProgress));
        assert!(cart.state().is_loading());
    }

    #[test]
    fn test_begin_checkout_rejects_empty_cart() {
        let mut cart = store();
        assert_eq!(cart.begin_checkout(), Err(CartError::EmptyCart));
        assert!(!cart.state().is_loading());
    }

    #[test]
    fn test_checkout_success() {
        let mut cart = store();
        cart.add_to_cart(item("v1", 1));
        cart.begin_checkout().unwrap();
        cart.complete_checkout(Ok(Checkout {
            id: "c1".to_string(),
            web_url: "https://x/checkout".to_string(),
        }));

        assert!(!cart.state().is_loading());
        assert_eq!(cart.state().checkout_url(), Some("https://x/checkout"));
        assert_eq!(cart.state().error(), None);
        let saves = cart.storage().saves.borrow();
        assert_eq!(
            saves.last().unwrap().checkout_url.as_deref(),
            Some("https://x/checkout")
        );
    }

    #[test]
    fn test_checkout_failure_keeps_previous_url() {
        let mut cart = store();
        cart.add_to_cart(item("v1", 1));
        cart.begin_checkout().unwrap();
        cart.complete_checkout(Ok(Checkout {
            id: "c1".to_string(),
            web_url: "https://x/first".to_string(),
        }));

        cart.begin_checkout().unwrap();
        cart.complete_checkout(Err(CheckoutError::Validation(
            "Variant is out of stock".to_string(),
        )));

        assert!(!cart.state().is_loading());
        assert_eq!(cart.state().error(), Some("Variant is out of stock"));
        assert_eq!(cart.state().checkout_url(), Some("https://x/first"));
    }

    #[test]
    fn test_retry_clears_previous_error() {
        let mut cart = store();
        cart.add_to_cart(item("v1", 1));
        cart.begin_checkout().unwrap();
        cart.complete_checkout(Err(CheckoutError::Network("offline".to_string())));
        assert!(cart.state().error().is_some());

        cart.begin_checkout().unwrap();
        assert_eq!(cart.state().error(), None);
    }

    #[test]
    fn test_ephemeral_storage_starts_empty() {
        let mut cart = CartStore::load(EphemeralStorage);
        cart.add_to_cart(item("v1", 1));
        assert_eq!(cart.state().item_count(), 1);
        assert!(CartStore::load(EphemeralStorage).state().is_empty());
    }
}
