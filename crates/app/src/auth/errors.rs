//! Auth errors.

use thiserror::Error;

use crate::documents::DocumentStoreError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,

    #[error("email address is invalid")]
    InvalidEmail,

    #[error("password must be at least {minimum} characters")]
    WeakPassword { minimum: usize },

    #[error("email address is already registered")]
    EmailInUse,

    #[error("email or password is incorrect")]
    InvalidCredentials,

    #[error("credential storage error")]
    Store(#[from] DocumentStoreError),
}
