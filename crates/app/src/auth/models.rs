//! Auth data models.

use serde::{Deserialize, Serialize};
use storefront::uuids::TypedUuid;

/// User id assigned at sign-up.
pub type UserId = TypedUuid<AuthUser>;

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
}

/// Stored sign-in credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CredentialRecord {
    pub user_id: UserId,
    pub email: String,
    pub salt: String,
    pub password_hash: String,
}
