//! Profiles service errors.

use thiserror::Error;

use crate::{auth::AuthError, documents::DocumentStoreError};

#[derive(Debug, Error)]
pub enum ProfilesServiceError {
    #[error("profile not found")]
    NotFound,

    #[error("invalid data: {0}")]
    InvalidData(&'static str),

    #[error("authentication failed")]
    Auth(#[from] AuthError),

    #[error("profile storage error")]
    Store(#[source] DocumentStoreError),
}

impl From<DocumentStoreError> for ProfilesServiceError {
    fn from(error: DocumentStoreError) -> Self {
        match error {
            DocumentStoreError::NotFound { .. } => Self::NotFound,
            error => Self::Store(error),
        }
    }
}
