//! Documents Repository

use serde_json::Value;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::documents::{Direction, Document, DocumentStoreError, Query};

const GET_DOCUMENT_SQL: &str = include_str!("sql/get_document.sql");
const SET_DOCUMENT_SQL: &str = include_str!("sql/set_document.sql");
const SET_STAMPED_DOCUMENT_SQL: &str = include_str!("sql/set_stamped_document.sql");
const UPDATE_DOCUMENT_SQL: &str = include_str!("sql/update_document.sql");
const DELETE_DOCUMENT_SQL: &str = include_str!("sql/delete_document.sql");
const QUERY_DOCUMENTS_SQL: &str = include_str!("sql/query_documents.sql");

/// Row shape shared by every document query.
#[derive(Debug)]
pub(crate) struct DocumentRow {
    pub id: String,
    pub data: Value,
}

impl<'r> FromRow<'r, PgRow> for DocumentRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            data: row.try_get("data")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDocumentsRepository;

impl PgDocumentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_document(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        collection: &str,
        id: &str,
    ) -> Result<Option<DocumentRow>, DocumentStoreError> {
        query_as::<Postgres, DocumentRow>(GET_DOCUMENT_SQL)
            .bind(collection)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(DocumentStoreError::from)
    }

    pub(crate) async fn set_document(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        collection: &str,
        id: &str,
        data: Document,
        server_timestamp: Option<&str>,
    ) -> Result<(), DocumentStoreError> {
        let statement = match server_timestamp {
            Some(field) => query(SET_STAMPED_DOCUMENT_SQL)
                .bind(collection)
                .bind(id)
                .bind(Value::Object(data))
                .bind(field),
            None => query(SET_DOCUMENT_SQL)
                .bind(collection)
                .bind(id)
                .bind(Value::Object(data)),
        };

        statement.execute(&mut **tx).await?;

        Ok(())
    }

    pub(crate) async fn update_document(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<u64, DocumentStoreError> {
        let result = query(UPDATE_DOCUMENT_SQL)
            .bind(collection)
            .bind(id)
            .bind(Value::Object(fields))
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    pub(crate) async fn delete_document(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        collection: &str,
        id: &str,
    ) -> Result<(), DocumentStoreError> {
        query(DELETE_DOCUMENT_SQL)
            .bind(collection)
            .bind(id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn query_documents(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        query: &Query,
    ) -> Result<Vec<DocumentRow>, DocumentStoreError> {
        let (field, descending) = match query.ordering() {
            Some((field, direction)) => (Some(field), direction == Direction::Descending),
            None => (None, false),
        };

        query_as::<Postgres, DocumentRow>(QUERY_DOCUMENTS_SQL)
            .bind(query.collection_name())
            .bind(Value::Object(query.filter_object()))
            .bind(field)
            .bind(descending)
            .fetch_all(&mut **tx)
            .await
            .map_err(DocumentStoreError::from)
    }
}
