//! Roles

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which dashboard an account may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees every order and can change order status.
    Admin,

    /// Shops, uploads products and submits catering requests.
    User,
}

impl Role {
    /// Lowercase name used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
