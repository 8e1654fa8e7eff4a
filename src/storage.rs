//! Key-Value Storage
//!
//! A synchronous string key-value store scoped to one client, in the manner of
//! browser local storage. Values are opaque strings; callers own the encoding.

use std::{fmt::Debug, io};

use thiserror::Error;

mod file;
mod memory;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

/// Errors raised when persisting a value.
#[derive(Debug, Error)]
pub enum KeyValueError {
    /// The backing file could not be read or written.
    #[error("key-value storage I/O failed")]
    Io(#[from] io::Error),

    /// A value could not be encoded for storage.
    #[error("failed to encode value for storage")]
    Encode(#[from] serde_json::Error),
}

/// Synchronous key-value store.
pub trait KeyValueStore: Debug + Send + Sync {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyValueError`] when the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyValueError`] when the removal cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), KeyValueError>;
}
