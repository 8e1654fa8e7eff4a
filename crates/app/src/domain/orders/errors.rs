//! Orders service errors.

use thiserror::Error;

use crate::{documents::DocumentStoreError, domain::products::ProductsServiceError};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("product lookup failed")]
    Product(#[from] ProductsServiceError),

    #[error("order storage error")]
    Store(#[source] DocumentStoreError),
}

impl From<DocumentStoreError> for OrdersServiceError {
    fn from(error: DocumentStoreError) -> Self {
        match error {
            DocumentStoreError::NotFound { .. } => Self::NotFound,
            error => Self::Store(error),
        }
    }
}
