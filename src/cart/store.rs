//! Local Cart Store

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::CartLineItem,
    storage::{KeyValueError, KeyValueStore},
};

/// Storage key holding the JSON-encoded cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors raised by cart mutations.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// Attempted to remove a position past the end of the cart.
    #[error("cart position {index} is out of range for a cart of {len} items")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,

        /// Number of line items in the cart.
        len: usize,
    },

    /// The cart could not be persisted.
    #[error("failed to persist cart")]
    Storage(#[from] KeyValueError),
}

/// Cart persisted as a JSON array under [`CART_STORAGE_KEY`].
///
/// The persisted value is the source of truth: every operation reads it
/// afresh, so several handles over the same storage stay consistent.
#[derive(Debug, Clone)]
pub struct LocalCartStore {
    storage: Arc<dyn KeyValueStore>,
}

impl LocalCartStore {
    /// Create a cart store over the given storage.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Read the persisted cart.
    ///
    /// A missing or malformed value reads as an empty cart.
    pub fn read(&self) -> Vec<CartLineItem> {
        let Some(raw) = self.storage.get(CART_STORAGE_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str::<Option<Vec<CartLineItem>>>(&raw) {
            Ok(items) => items.unwrap_or_default(),
            Err(error) => {
                warn!("discarding malformed local cart: {error}");

                Vec::new()
            }
        }
    }

    /// Replace the persisted cart wholesale.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStoreError::Storage`] when the cart cannot be persisted.
    pub fn write(&self, items: &[CartLineItem]) -> Result<(), CartStoreError> {
        let encoded = serde_json::to_string(items).map_err(KeyValueError::from)?;

        self.storage.set(CART_STORAGE_KEY, &encoded)?;

        debug!(items = items.len(), "wrote local cart");

        Ok(())
    }

    /// Append a line item, returning the updated cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStoreError::Storage`] when the cart cannot be persisted.
    pub fn append(&self, item: CartLineItem) -> Result<Vec<CartLineItem>, CartStoreError> {
        let mut items = self.read();

        items.push(item);

        self.write(&items)?;

        Ok(items)
    }

    /// Remove the line item at `index`, returning the updated cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::IndexOutOfRange`] without touching storage when
    /// `index` is past the end, or [`CartStoreError::Storage`] when the cart
    /// cannot be persisted.
    pub fn remove_at(&self, index: usize) -> Result<Vec<CartLineItem>, CartStoreError> {
        let mut items = self.read();

        if index >= items.len() {
            return Err(CartStoreError::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }

        items.remove(index);

        self.write(&items)?;

        Ok(items)
    }

    /// Remove the persisted cart entirely.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStoreError::Storage`] when the removal cannot be persisted.
    pub fn clear(&self) -> Result<(), CartStoreError> {
        self.storage.remove(CART_STORAGE_KEY)?;

        debug!("cleared local cart");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::MemoryKeyValueStore;

    use super::*;

    fn store() -> (Arc<MemoryKeyValueStore>, LocalCartStore) {
        let storage = Arc::new(MemoryKeyValueStore::new());

        (storage.clone(), LocalCartStore::new(storage))
    }

    fn items() -> Vec<CartLineItem> {
        vec![
            CartLineItem::new("Masala Dosa", 120, "images/dosa.jpg"),
            CartLineItem::new("Filter Coffee", 40, "images/coffee.jpg"),
            CartLineItem::new("Masala Dosa", 120, "images/dosa.jpg"),
        ]
    }

    #[test]
    fn empty_storage_reads_as_empty_cart() {
        let (_, cart) = store();

        assert!(cart.read().is_empty());
    }

    #[test]
    fn write_then_read_round_trips() -> TestResult {
        let (_, cart) = store();

        cart.write(&items())?;

        assert_eq!(cart.read(), items());

        Ok(())
    }

    #[test]
    fn write_is_idempotent() -> TestResult {
        let (_, cart) = store();

        cart.write(&items())?;
        cart.write(&items())?;

        assert_eq!(cart.read(), items());

        Ok(())
    }

    #[test]
    fn malformed_value_reads_as_empty_cart() -> TestResult {
        let (storage, cart) = store();

        storage.set(CART_STORAGE_KEY, "{\"not\": \"a list\"")?;

        assert!(cart.read().is_empty());

        Ok(())
    }

    #[test]
    fn null_value_reads_as_empty_cart() -> TestResult {
        let (storage, cart) = store();

        storage.set(CART_STORAGE_KEY, "null")?;

        assert!(cart.read().is_empty());

        Ok(())
    }

    #[test]
    fn append_keeps_insertion_order_and_duplicates() -> TestResult {
        let (_, cart) = store();

        for item in items() {
            cart.append(item)?;
        }

        assert_eq!(cart.read(), items());

        Ok(())
    }

    #[test]
    fn remove_at_removes_exactly_one_position() -> TestResult {
        let (_, cart) = store();

        for index in 0..items().len() {
            cart.write(&items())?;

            let remaining = cart.remove_at(index)?;

            let mut expected = items();
            expected.remove(index);

            assert_eq!(remaining, expected);
            assert_eq!(cart.read(), expected);
            assert_eq!(cart.read().len(), items().len() - 1);
        }

        Ok(())
    }

    #[test]
    fn remove_at_out_of_range_leaves_cart_untouched() -> TestResult {
        let (_, cart) = store();

        cart.write(&items())?;

        let result = cart.remove_at(3);

        assert!(
            matches!(result, Err(CartStoreError::IndexOutOfRange { index: 3, len: 3 })),
            "expected IndexOutOfRange, got {result:?}"
        );
        assert_eq!(cart.read(), items());

        Ok(())
    }

    #[test]
    fn clear_removes_the_storage_key() -> TestResult {
        let (storage, cart) = store();

        cart.write(&items())?;
        cart.clear()?;

        assert_eq!(storage.get(CART_STORAGE_KEY), None);
        assert!(cart.read().is_empty());

        Ok(())
    }
}
