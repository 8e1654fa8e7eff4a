//! Document store errors.

use sqlx::Error;
use storefront::storage::KeyValueError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("document {collection}/{id} does not match its schema")]
    Malformed {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode document")]
    Encode(#[from] serde_json::Error),

    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("failed to save documents locally")]
    Local(#[source] KeyValueError),

    #[error("saved documents are unreadable")]
    Unreadable(#[source] serde_json::Error),
}

impl DocumentStoreError {
    pub(crate) fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<Error> for DocumentStoreError {
    fn from(error: Error) -> Self {
        match error {
            Error::PoolTimedOut | Error::PoolClosed | Error::Io(_) => {
                Self::Unavailable(error.to_string())
            }
            error => Self::Sql(error),
        }
    }
}
