//! PostgreSQL document store.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::{
    database::Db,
    documents::{
        Document, DocumentSnapshot, DocumentStore, DocumentStoreError, Query, WriteBatch,
        WriteOperation,
        repository::{DocumentRow, PgDocumentsRepository},
    },
};

/// Documents kept as `jsonb` rows in a single `documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    db: Db,
    repository: PgDocumentsRepository,
}

impl PgDocumentStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgDocumentsRepository::new(),
        }
    }

    async fn apply(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        operation: WriteOperation,
    ) -> Result<(), DocumentStoreError> {
        match operation {
            WriteOperation::Set {
                collection,
                id,
                data,
                server_timestamp,
            } => {
                self.repository
                    .set_document(tx, &collection, &id, data, server_timestamp.as_deref())
                    .await
            }
            WriteOperation::Update {
                collection,
                id,
                fields,
            } => {
                let rows_affected = self
                    .repository
                    .update_document(tx, &collection, &id, fields)
                    .await?;

                if rows_affected == 0 {
                    return Err(DocumentStoreError::not_found(&collection, &id));
                }

                Ok(())
            }
            WriteOperation::Delete { collection, id } => {
                self.repository.delete_document(tx, &collection, &id).await
            }
        }
    }
}

fn snapshot(collection: &str, row: DocumentRow) -> Result<DocumentSnapshot, DocumentStoreError> {
    match row.data {
        Value::Object(data) => Ok(DocumentSnapshot {
            collection: collection.to_string(),
            id: row.id,
            data,
        }),
        other => Err(DocumentStoreError::Malformed {
            collection: collection.to_string(),
            id: row.id,
            source: serde::de::Error::custom(format!("expected a JSON object, got {other}")),
        }),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DocumentSnapshot>, DocumentStoreError> {
        let mut tx = self.db.begin_transaction().await?;

        let row = self.repository.get_document(&mut tx, collection, id).await?;

        tx.commit().await?;

        row.map(|row| snapshot(collection, row)).transpose()
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> Result<(), DocumentStoreError> {
        let mut tx = self.db.begin_transaction().await?;

        self.repository
            .set_document(&mut tx, collection, id, data, None)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), DocumentStoreError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self
            .repository
            .update_document(&mut tx, collection, id, fields)
            .await?;

        if rows_affected == 0 {
            return Err(DocumentStoreError::not_found(collection, id));
        }

        tx.commit().await?;

        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentStoreError> {
        let mut tx = self.db.begin_transaction().await?;

        self.repository
            .delete_document(&mut tx, collection, id)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn query(&self, query: Query) -> Result<Vec<DocumentSnapshot>, DocumentStoreError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows = self.repository.query_documents(&mut tx, &query).await?;

        tx.commit().await?;

        rows.into_iter()
            .map(|row| snapshot(query.collection_name(), row))
            .collect()
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), DocumentStoreError> {
        let mut tx = self.db.begin_transaction().await?;

        let operations = batch.len();

        for operation in batch {
            self.apply(&mut tx, operation).await?;
        }

        tx.commit().await?;

        debug!(operations, "committed document batch");

        Ok(())
    }
}
