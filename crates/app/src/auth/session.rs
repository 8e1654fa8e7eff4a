//! Persisted sessions.

use std::sync::Arc;

use storefront::storage::{KeyValueError, KeyValueStore};
use tracing::warn;

use crate::auth::AuthUser;

/// Storage key holding the signed-in user.
pub const SESSION_STORAGE_KEY: &str = "session";

/// Keeps the signed-in user in the key-value store between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// The persisted user, if any. A malformed value reads as signed out.
    #[must_use]
    pub fn load(&self) -> Option<AuthUser> {
        let raw = self.storage.get(SESSION_STORAGE_KEY)?;

        serde_json::from_str(&raw)
            .inspect_err(|error| warn!("discarding malformed session: {error}"))
            .ok()
    }

    /// Persist `user` as the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error when the session cannot be written.
    pub fn save(&self, user: &AuthUser) -> Result<(), KeyValueError> {
        self.storage
            .set(SESSION_STORAGE_KEY, &serde_json::to_string(user)?)
    }

    /// Forget the persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error when the session cannot be removed.
    pub fn clear(&self) -> Result<(), KeyValueError> {
        self.storage.remove(SESSION_STORAGE_KEY)
    }
}
