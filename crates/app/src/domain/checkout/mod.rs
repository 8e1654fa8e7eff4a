//! Checkout
//!
//! Turns the cart into one placed order per line item, written as a single
//! batch, then empties the cart.

pub mod errors;
pub mod service;

pub use errors::CheckoutError;
pub use service::CheckoutService;
