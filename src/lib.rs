//! Storefront
//!
//! Offline-first core of a food-ordering storefront: the local cart and its
//! view, the key-value store it persists to, catering reservations, and the
//! shared record types used by the application services.

pub mod cart;
pub mod catering;
pub mod orders;
pub mod prices;
pub mod profiles;
pub mod storage;
pub mod uuids;
