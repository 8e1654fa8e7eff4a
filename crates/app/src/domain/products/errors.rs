//! Products service errors.

use thiserror::Error;

use crate::documents::DocumentStoreError;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product not found")]
    NotFound,

    #[error("missing required data: {0}")]
    MissingRequiredData(&'static str),

    #[error("product storage error")]
    Store(#[source] DocumentStoreError),
}

impl From<DocumentStoreError> for ProductsServiceError {
    fn from(error: DocumentStoreError) -> Self {
        match error {
            DocumentStoreError::NotFound { .. } => Self::NotFound,
            error => Self::Store(error),
        }
    }
}
