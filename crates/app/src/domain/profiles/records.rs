//! Profile Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use storefront::profiles::Role;

use crate::auth::UserId;

/// Stored shape of a `users` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub email: String,
    pub role: Role,
    pub name: String,
    pub address: String,
    #[serde(with = "jiff::fmt::serde::timestamp::millisecond::required")]
    pub created_at: Timestamp,
}

/// A user's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub address: String,
    pub created_at: Timestamp,
}

impl UserProfile {
    pub(crate) fn from_record(id: UserId, record: ProfileRecord) -> Self {
        Self {
            id,
            email: record.email,
            role: record.role,
            name: record.name,
            address: record.address,
            created_at: record.created_at,
        }
    }
}
