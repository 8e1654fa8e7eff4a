//! In-memory key-value store

use std::{
    collections::BTreeMap,
    sync::{Mutex, PoisonError},
};

use super::{KeyValueError, KeyValueStore};

/// Process-local key-value store. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let store = MemoryKeyValueStore::new();

        assert_eq!(store.get("cart"), None);
    }

    #[test]
    fn set_replaces_previous_value() -> TestResult {
        let store = MemoryKeyValueStore::new();

        store.set("cart", "[]")?;
        store.set("cart", "[1]")?;

        assert_eq!(store.get("cart").as_deref(), Some("[1]"));
        assert_eq!(store.len(), 1);

        Ok(())
    }

    #[test]
    fn remove_is_idempotent() -> TestResult {
        let store = MemoryKeyValueStore::new();

        store.set("cart", "[]")?;
        store.remove("cart")?;
        store.remove("cart")?;

        assert!(store.is_empty());

        Ok(())
    }
}
