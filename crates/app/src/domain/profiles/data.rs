//! Profiles Data

use serde::Serialize;
use storefront::profiles::Role;

/// Display name given to freshly registered accounts.
pub const DEFAULT_NAME: &str = "New User";

/// Address given to freshly registered accounts.
pub const DEFAULT_ADDRESS: &str = "Unknown";

/// New Profile Data. `createdAt` is stamped by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct NewProfile {
    pub email: String,
    pub role: Role,
    pub name: String,
    pub address: String,
}

impl NewProfile {
    pub(crate) fn for_email(email: &str) -> Self {
        Self {
            email: email.to_string(),
            role: Role::User,
            name: DEFAULT_NAME.to_string(),
            address: DEFAULT_ADDRESS.to_string(),
        }
    }
}

/// Profile Update Data. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ProfileUpdate {
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none()
    }
}
