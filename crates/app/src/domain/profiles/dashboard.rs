//! Role-gated dashboards.

use std::sync::Arc;

use storefront::profiles::Role;
use thiserror::Error;
use tracing::warn;

use crate::{
    auth::{AuthProvider, AuthUser},
    domain::profiles::{ProfilesService, ProfilesServiceError, records::UserProfile},
};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("sign in to open the {required} dashboard")]
    NotAuthenticated { required: Role },

    #[error("access denied: {required} account required")]
    AccessDenied { required: Role },

    #[error("failed to load profile")]
    Profiles(#[source] ProfilesServiceError),
}

/// An opened dashboard: the signed-in user and their profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub user: AuthUser,
    pub profile: UserProfile,
}

/// Opens dashboards for the signed-in user's role.
pub struct Dashboards {
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfilesService>,
}

impl Dashboards {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthProvider>, profiles: Arc<dyn ProfilesService>) -> Self {
        Self { auth, profiles }
    }

    /// Open the dashboard for `role`.
    ///
    /// A signed-in user whose profile is missing or has another role is
    /// signed out.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotAuthenticated`] without a session,
    /// [`DashboardError::AccessDenied`] on a role mismatch, or
    /// [`DashboardError::Profiles`] when the profile cannot be read.
    pub async fn open(&self, role: Role) -> Result<Dashboard, DashboardError> {
        let user = self
            .auth
            .current_user()
            .ok_or(DashboardError::NotAuthenticated { required: role })?;

        match self.profiles.get_profile(user.id).await {
            Ok(profile) if profile.role == role => Ok(Dashboard { user, profile }),
            Ok(_) | Err(ProfilesServiceError::NotFound) => {
                warn!(user = %user.id, required = %role, "access denied");

                self.auth.sign_out().await;

                Err(DashboardError::AccessDenied { required: role })
            }
            Err(error) => Err(DashboardError::Profiles(error)),
        }
    }
}
