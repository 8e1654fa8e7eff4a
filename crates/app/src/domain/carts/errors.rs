//! Cart session errors.

use storefront::cart::CartStoreError;
use thiserror::Error;

use crate::domain::{carts::session::MAX_UNITS_PER_ADD, products::ProductsServiceError};

#[derive(Debug, Error)]
pub enum CartSessionError {
    #[error("quantity must be between 1 and {MAX_UNITS_PER_ADD}")]
    InvalidQuantity,

    #[error("local cart error")]
    Cart(#[from] CartStoreError),

    #[error("product lookup failed")]
    Product(#[from] ProductsServiceError),
}
