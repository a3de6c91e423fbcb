//! Cart persistence over a key-value slot store.
//!
//! The cart record lives in one slot under [`CART_KEY`]. Slot stores report
//! I/O errors; [`CartPersistence`] logs and swallows them so the cart keeps
//! working in memory when the disk does not.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use shopfront_core::{CartStorage, PersistedCart};
use tracing::{debug, warn};

/// Slot holding the serialized cart.
pub const CART_KEY: &str = "shopfront.cart";

/// Raw string storage addressed by key.
pub trait SlotStore: Send + Sync {
    /// Read the value under `key`, `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read.
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn write(&self, key: &str, data: &str) -> io::Result<()>;
}

// =============================================================================
// File Slots
// =============================================================================

/// One `<key>.json` file per slot inside a directory.
///
/// Writes go to a temporary file that is then renamed over the slot, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    /// Slots under `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, key: &str, data: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, data)?;
        fs::rename(&tmp, self.path_for(key))
    }
}

// =============================================================================
// Memory Slots
// =============================================================================

/// Slots held in process memory.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.slots().get(key).cloned())
    }

    fn write(&self, key: &str, data: &str) -> io::Result<()> {
        self.slots().insert(key.to_owned(), data.to_owned());
        Ok(())
    }
}

// =============================================================================
// CartPersistence
// =============================================================================

/// [`CartStorage`] backed by a [`SlotStore`].
#[derive(Debug, Clone)]
pub struct CartPersistence<S> {
    slots: S,
}

impl<S: SlotStore> CartPersistence<S> {
    /// Persist the cart in `slots`.
    pub const fn new(slots: S) -> Self {
        Self { slots }
    }

    /// Underlying slot store.
    pub const fn slots(&self) -> &S {
        &self.slots
    }
}

impl CartPersistence<FileSlotStore> {
    /// Persist the cart as `shopfront.cart.json` inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileSlotStore::new(dir))
    }
}

impl<S: SlotStore> CartStorage for CartPersistence<S> {
    fn load(&self) -> Option<PersistedCart> {
        let raw = match self.slots.read(CART_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = CART_KEY, "No saved cart");
                return None;
            }
            Err(e) => {
                warn!(key = CART_KEY, error = %e, "Failed to read saved cart");
                return None;
            }
        };

        match serde_json::from_str::<PersistedCart>(&raw) {
            Ok(cart) => Some(cart),
            Err(e) => {
                warn!(key = CART_KEY, error = %e, "Discarding unreadable saved cart");
                None
            }
        }
    }

    fn save(&self, cart: &PersistedCart) {
        let data = match serde_json::to_string(cart) {
            Ok(data) => data,
            Err(e) => {
                warn!(key = CART_KEY, error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.slots.write(CART_KEY, &data) {
            warn!(key = CART_KEY, error = %e, "Failed to save cart");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopfront_core::{CartStore, CurrencyCode, LineItem, ProductId, Quantity, VariantId};

    use super::*;

    fn item(id: &str, qty: u32) -> LineItem {
        LineItem {
            id: VariantId::parse(id).unwrap(),
            product_id: ProductId::parse("gid://shopify/Product/1").unwrap(),
            title: "Tee".to_string(),
            variant_title: Some("M".to_string()),
            handle: "tee".to_string(),
            price: Decimal::new(2000, 2),
            currency_code: CurrencyCode::usd(),
            image_url: String::new(),
            quantity: Quantity::new(qty).unwrap(),
        }
    }

    /// Slot store whose every operation fails.
    struct BrokenSlots;

    impl SlotStore for BrokenSlots {
        fn read(&self, _key: &str) -> io::Result<Option<String>> {
            Err(io::Error::other("disk on fire"))
        }

        fn write(&self, _key: &str, _data: &str) -> io::Result<()> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn test_file_slot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let slots = FileSlotStore::new(dir.path().join("nested"));

        assert_eq!(slots.read("k").unwrap(), None);
        slots.write("k", "one").unwrap();
        slots.write("k", "two").unwrap();
        assert_eq!(slots.read("k").unwrap().as_deref(), Some("two"));
        assert!(slots.path_for("k").ends_with("k.json"));
    }

    #[test]
    fn test_file_slot_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let slots = FileSlotStore::new(dir.path());
        slots.write(CART_KEY, "{}").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["shopfront.cart.json".to_string()]);
    }

    #[test]
    fn test_persistence_round_trip() {
        let storage = CartPersistence::new(MemorySlotStore::new());
        let cart = PersistedCart {
            items: vec![item("v1", 2), item("v2", 1)],
            checkout_url: Some("https://shop.example.com/c/1".to_string()),
        };

        storage.save(&cart);
        assert_eq!(storage.load(), Some(cart));
    }

    #[test]
    fn test_saved_record_uses_camel_case_keys() {
        let storage = CartPersistence::new(MemorySlotStore::new());
        storage.save(&PersistedCart::default());

        let raw = storage.slots().read(CART_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json, serde_json::json!({"items": [], "checkoutUrl": null}));
    }

    #[test]
    fn test_missing_record_loads_as_none() {
        let storage = CartPersistence::new(MemorySlotStore::new());
        assert_eq!(storage.load(), None);
    }

    #[test]
    fn test_corrupt_record_loads_as_none() {
        let slots = MemorySlotStore::new();
        slots.write(CART_KEY, "{not json").unwrap();
        let storage = CartPersistence::new(slots);
        assert_eq!(storage.load(), None);
    }

    #[test]
    fn test_invalid_item_makes_record_corrupt() {
        let slots = MemorySlotStore::new();
        let record = serde_json::json!({
            "items": [{
                "id": "v1",
                "productId": "p1",
                "title": "Tee",
                "variantTitle": null,
                "handle": "tee",
                "price": "20.00",
                "currencyCode": "USD",
                "imageUrl": "",
                "quantity": 0
            }],
            "checkoutUrl": null
        });
        slots.write(CART_KEY, &record.to_string()).unwrap();

        let storage = CartPersistence::new(slots);
        assert_eq!(storage.load(), None);
    }

    #[test]
    fn test_broken_slots_are_swallowed() {
        let storage = CartPersistence::new(BrokenSlots);
        storage.save(&PersistedCart::default());
        assert_eq!(storage.load(), None);

        let mut store = CartStore::load(storage);
        store.add_to_cart(item("v1", 1));
        assert_eq!(store.state().item_count(), 1);
    }

    #[test]
    fn test_store_reloads_from_file() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = CartStore::load(CartPersistence::in_dir(dir.path()));
        store.add_to_cart(item("v1", 2));
        store.add_to_cart(item("v2", 1));
        store.remove_from_cart(&VariantId::parse("v2").unwrap());

        let reloaded = CartStore::load(CartPersistence::in_dir(dir.path()));
        assert_eq!(reloaded.state(), store.state());
    }

    #[test]
    fn test_loaded_store_owns_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut owner = CartStore::load(CartPersistence::in_dir(dir.path()));

        // A second writer after the owner loaded is not seen by it, and the
        // owner's next change replaces the whole record.
        let mut other = CartStore::load(CartPersistence::in_dir(dir.path()));
        other.add_to_cart(item("v9", 1));
        owner.add_to_cart(item("v1", 1));

        let saved = CartPersistence::in_dir(dir.path()).load().unwrap();
        let ids: Vec<_> = saved.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["v1"]);
    }
}
