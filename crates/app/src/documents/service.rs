//! Document store service.

use async_trait::async_trait;
use mockall::automock;

use crate::documents::{Document, DocumentSnapshot, DocumentStoreError, Query, WriteBatch};

/// Remote document database: collections of JSON documents addressed by id.
#[automock]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document; `None` when it does not exist.
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DocumentSnapshot>, DocumentStoreError>;

    /// Create or overwrite a document.
    async fn set(&self, collection: &str, id: &str, data: Document)
    -> Result<(), DocumentStoreError>;

    /// Merge top-level fields into an existing document.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), DocumentStoreError>;

    /// Remove a document. Removing a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentStoreError>;

    /// Run a filtered, optionally ordered query.
    async fn query(&self, query: Query) -> Result<Vec<DocumentSnapshot>, DocumentStoreError>;

    /// Apply every write in the batch, or none of them.
    async fn commit(&self, batch: WriteBatch) -> Result<(), DocumentStoreError>;
}
