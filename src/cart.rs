//! Cart
//!
//! The shopper's cart lives in the local key-value store, independent of any
//! signed-in session. Line items are kept in insertion order and addressed by
//! position; adding the same product twice yields two line items.

mod line_item;
mod store;
mod view;

pub use line_item::{CartLineItem, DEFAULT_IMAGE};
pub use store::{CART_STORAGE_KEY, CartStoreError, LocalCartStore};
pub use view::{CartLine, CartSummary, CartView};
