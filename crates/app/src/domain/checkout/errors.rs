//! Checkout errors.

use thiserror::Error;

use crate::documents::DocumentStoreError;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("a checkout is already in progress")]
    InFlight,

    #[error("sign in to check out")]
    NotAuthenticated,

    #[error("the cart is empty")]
    EmptyCart,

    #[error("failed to place orders")]
    Commit(#[source] DocumentStoreError),
}
