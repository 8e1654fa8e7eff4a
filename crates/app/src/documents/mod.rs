//! Documents
//!
//! The remote backend's document database: collections of JSON objects keyed
//! by id, queried by equality and ordered by one field, written in atomic
//! batches.

mod errors;
mod memory;
mod models;
mod postgres;
mod repository;
pub mod schema;
mod service;

pub use errors::DocumentStoreError;
pub use memory::{DOCUMENTS_STORAGE_KEY, MemoryDocumentStore};
pub use models::*;
pub use postgres::PgDocumentStore;
pub use schema::{decode, encode};
pub use service::*;

/// Collection of user profiles, keyed by user id.
pub const USERS: &str = "users";

/// Collection of sign-in credentials, keyed by lower-cased email.
pub const CREDENTIALS: &str = "credentials";

/// Collection of catalog products.
pub const PRODUCTS: &str = "products";

/// Collection of orders.
pub const ORDERS: &str = "orders";

/// Collection of mirrored carts, keyed by user id.
pub const CARTS: &str = "carts";
