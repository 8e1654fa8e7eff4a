//! In-memory document store.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront::storage::KeyValueStore;
use tracing::debug;

use crate::documents::{
    Document, DocumentSnapshot, DocumentStore, DocumentStoreError, Query, WriteBatch,
    WriteOperation,
};

/// Key under which a persisted store keeps its documents.
pub const DOCUMENTS_STORAGE_KEY: &str = "documents";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MemoryState {
    collections: BTreeMap<String, BTreeMap<String, Document>>,
    clock: i64,
    #[serde(skip)]
    writes: usize,
}

impl MemoryState {
    /// Milliseconds since the epoch, strictly increasing across calls.
    fn stamp(&mut self) -> i64 {
        self.clock = Timestamp::now()
            .as_millisecond()
            .max(self.clock.saturating_add(1));

        self.clock
    }

    fn apply(&mut self, operation: WriteOperation) -> Result<(), DocumentStoreError> {
        match operation {
            WriteOperation::Set {
                collection,
                id,
                mut data,
                server_timestamp,
            } => {
                if let Some(field) = server_timestamp {
                    data.insert(field, Value::from(self.stamp()));
                }

                self.collections.entry(collection).or_default().insert(id, data);
            }
            WriteOperation::Update {
                collection,
                id,
                fields,
            } => {
                let document = self
                    .collections
                    .get_mut(&collection)
                    .and_then(|documents| documents.get_mut(&id))
                    .ok_or_else(|| DocumentStoreError::not_found(&collection, &id))?;

                document.extend(fields);
            }
            WriteOperation::Delete { collection, id } => {
                if let Some(documents) = self.collections.get_mut(&collection) {
                    documents.remove(&id);
                }
            }
        }

        self.writes += 1;

        Ok(())
    }
}

/// Document store held in process memory.
///
/// Writes are applied to a copy of the state which replaces the original only
/// when every write succeeds and, for a persisted store, the copy has been
/// saved.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    state: Mutex<MemoryState>,
    storage: Option<Arc<dyn KeyValueStore>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store saved under [`DOCUMENTS_STORAGE_KEY`] in `storage`,
    /// loading whatever an earlier run left there.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Unreadable`] when the saved documents
    /// cannot be parsed.
    pub fn persisted(storage: Arc<dyn KeyValueStore>) -> Result<Self, DocumentStoreError> {
        let state = match storage.get(DOCUMENTS_STORAGE_KEY) {
            Some(raw) => serde_json::from_str(&raw).map_err(DocumentStoreError::Unreadable)?,
            None => MemoryState::default(),
        };

        Ok(Self {
            state: Mutex::new(state),
            storage: Some(storage),
        })
    }

    /// Number of documents currently in `collection`.
    #[must_use]
    pub fn count(&self, collection: &str) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .collections
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Number of document writes applied so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .writes
    }

    fn write(
        &self,
        operations: impl IntoIterator<Item = WriteOperation>,
    ) -> Result<(), DocumentStoreError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let mut staged = state.clone();

        for operation in operations {
            staged.apply(operation)?;
        }

        if let Some(storage) = &self.storage {
            storage
                .set(DOCUMENTS_STORAGE_KEY, &serde_json::to_string(&staged)?)
                .map_err(DocumentStoreError::Local)?;
        }

        *state = staged;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DocumentSnapshot>, DocumentStoreError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(state
            .collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .map(|data| DocumentSnapshot {
                collection: collection.to_string(),
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> Result<(), DocumentStoreError> {
        self.write([WriteOperation::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            data,
            server_timestamp: None,
        }])
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), DocumentStoreError> {
        self.write([WriteOperation::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            fields,
        }])
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentStoreError> {
        self.write([WriteOperation::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        }])
    }

    async fn query(&self, query: Query) -> Result<Vec<DocumentSnapshot>, DocumentStoreError> {
        let mut snapshots = {
            let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

            state
                .collections
                .get(query.collection_name())
                .into_iter()
                .flatten()
                .filter(|(_, data)| query.matches(data))
                .map(|(id, data)| DocumentSnapshot {
                    collection: query.collection_name().to_string(),
                    id: id.clone(),
                    data: data.clone(),
                })
                .collect::<Vec<_>>()
        };

        query.sort(&mut snapshots);

        Ok(snapshots)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), DocumentStoreError> {
        let operations = batch.len();

        self.write(batch)?;

        debug!(operations, "committed document batch");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use storefront::storage::MemoryKeyValueStore;
    use testresult::TestResult;

    use crate::documents::Direction;

    use super::*;

    fn document(value: Value) -> Document {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn set_then_get_returns_the_document() -> TestResult {
        let store = MemoryDocumentStore::new();

        store
            .set("carts", "u1", document(json!({ "items": [] })))
            .await?;

        let snapshot = store.get("carts", "u1").await?;

        assert_eq!(
            snapshot.map(|s| s.data),
            Some(document(json!({ "items": [] })))
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_missing_document_returns_none() -> TestResult {
        let store = MemoryDocumentStore::new();

        assert_eq!(store.get("carts", "nobody").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn update_merges_top_level_fields() -> TestResult {
        let store = MemoryDocumentStore::new();

        store
            .set("users", "u1", document(json!({ "name": "New User", "role": "user" })))
            .await?;
        store
            .update("users", "u1", document(json!({ "name": "Asha" })))
            .await?;

        let data = store.get("users", "u1").await?.map(|s| s.data);

        assert_eq!(data, Some(document(json!({ "name": "Asha", "role": "user" }))));

        Ok(())
    }

    #[tokio::test]
    async fn update_missing_document_is_not_found() {
        let store = MemoryDocumentStore::new();

        let result = store
            .update("orders", "missing", document(json!({ "status": "completed" })))
            .await;

        assert!(
            matches!(result, Err(DocumentStoreError::NotFound { .. })),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn failed_batch_leaves_state_untouched() -> TestResult {
        let store = MemoryDocumentStore::new();

        let mut batch = WriteBatch::new();

        batch
            .set("orders", "o1", document(json!({ "status": "placed" })))
            .update("orders", "missing", document(json!({ "status": "completed" })));

        let result = store.commit(batch).await;

        assert!(result.is_err(), "batch with a bad update should fail");
        assert_eq!(store.count("orders"), 0);
        assert_eq!(store.write_count(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn stamped_sets_get_increasing_timestamps() -> TestResult {
        let store = MemoryDocumentStore::new();

        let mut batch = WriteBatch::new();

        batch
            .set_stamped("orders", "o1", Document::new(), "placedAt")
            .set_stamped("orders", "o2", Document::new(), "placedAt");

        store.commit(batch).await?;

        let snapshots = store
            .query(Query::collection("orders").order_by("placedAt", Direction::Descending))
            .await?;

        let ids: Vec<&str> = snapshots.iter().map(|s| s.id.as_str()).collect();

        assert_eq!(ids, vec!["o2", "o1"]);

        Ok(())
    }

    #[tokio::test]
    async fn query_filters_by_equality() -> TestResult {
        let store = MemoryDocumentStore::new();

        store
            .set("products", "p1", document(json!({ "userId": "a" })))
            .await?;
        store
            .set("products", "p2", document(json!({ "userId": "b" })))
            .await?;

        let snapshots = store
            .query(Query::collection("products").where_eq("userId", "b"))
            .await?;

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots.first().map(|s| s.id.as_str()), Some("p2"));

        Ok(())
    }

    #[tokio::test]
    async fn delete_is_idempotent() -> TestResult {
        let store = MemoryDocumentStore::new();

        store.set("carts", "u1", Document::new()).await?;
        store.delete("carts", "u1").await?;
        store.delete("carts", "u1").await?;

        assert_eq!(store.get("carts", "u1").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn persisted_documents_survive_reopening() -> TestResult {
        let storage = Arc::new(MemoryKeyValueStore::new());

        let mut batch = WriteBatch::new();

        batch.set_stamped("orders", "o1", document(json!({ "status": "placed" })), "placedAt");

        MemoryDocumentStore::persisted(storage.clone())?
            .commit(batch)
            .await?;

        let reopened = MemoryDocumentStore::persisted(storage)?;

        let snapshot = reopened.get("orders", "o1").await?;

        assert_eq!(
            snapshot
                .as_ref()
                .and_then(|s| s.data.get("status"))
                .and_then(Value::as_str),
            Some("placed")
        );
        assert!(
            snapshot
                .as_ref()
                .and_then(|s| s.data.get("placedAt"))
                .is_some_and(Value::is_i64)
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_batch_is_not_persisted() -> TestResult {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let store = MemoryDocumentStore::persisted(storage.clone())?;

        let mut batch = WriteBatch::new();

        batch
            .set("orders", "o1", document(json!({ "status": "placed" })))
            .update("orders", "missing", document(json!({ "status": "completed" })));

        assert!(store.commit(batch).await.is_err());
        assert_eq!(storage.get(DOCUMENTS_STORAGE_KEY), None);

        Ok(())
    }

    #[test]
    fn unreadable_saved_documents_are_an_error() -> TestResult {
        let storage = Arc::new(MemoryKeyValueStore::new());

        storage.set(DOCUMENTS_STORAGE_KEY, "not json")?;

        let result = MemoryDocumentStore::persisted(storage.clone());

        assert!(
            matches!(result, Err(DocumentStoreError::Unreadable(_))),
            "expected Unreadable, got {result:?}"
        );
        assert_eq!(
            storage.get(DOCUMENTS_STORAGE_KEY).as_deref(),
            Some("not json")
        );

        Ok(())
    }
}
