//! Authentication

mod errors;
mod models;
pub mod password;
mod provider;
mod session;

pub use errors::*;
pub use models::{AuthUser, UserId};
pub use provider::*;
pub use session::{SESSION_STORAGE_KEY, SessionStore};
