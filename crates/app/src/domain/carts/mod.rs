//! Carts
//!
//! The local cart is the source of truth. While a user is signed in, every
//! committed cart is mirrored best-effort to `carts/{userId}`; on sign-in a
//! non-empty mirror replaces the local cart.

pub mod errors;
pub mod mirror;
pub mod records;
pub mod session;
pub mod sync;

pub use errors::CartSessionError;
pub use mirror::RemoteCartMirror;
pub use session::CartSession;
pub use sync::SyncStatus;
