//! Catering service.

use std::sync::Arc;

use storefront::{
    catering::{Reservation, ReservationBook, ReservationRequest},
    profiles::Role,
};
use tracing::info;

use crate::{
    auth::AuthProvider,
    domain::{
        catering::errors::CateringError,
        profiles::{ProfilesService, ProfilesServiceError},
    },
};

pub struct CateringService {
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfilesService>,
    book: ReservationBook,
}

impl CateringService {
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        profiles: Arc<dyn ProfilesService>,
        book: ReservationBook,
    ) -> Self {
        Self {
            auth,
            profiles,
            book,
        }
    }

    /// Submit a catering request for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`CateringError::NotAuthenticated`] without a session,
    /// [`CateringError::UserRoleRequired`] for admins and users without a
    /// profile, a validation error when the party does not fit the menu, or
    /// [`CateringError::Storage`] when the reservation cannot be stored.
    pub async fn submit(&self, request: ReservationRequest) -> Result<Reservation, CateringError> {
        let user = self
            .auth
            .current_user()
            .ok_or(CateringError::NotAuthenticated)?;

        match self.profiles.get_profile(user.id).await {
            Ok(profile) if profile.role == Role::User => {}
            Ok(_) | Err(ProfilesServiceError::NotFound) => {
                return Err(CateringError::UserRoleRequired);
            }
            Err(error) => return Err(CateringError::Profiles(error)),
        }

        let reservation = self.book.record(request)?;

        info!(
            user = %user.id,
            guests = reservation.guests,
            menu = %reservation.menu,
            "submitted catering request"
        );

        Ok(reservation)
    }

    /// Every stored reservation, oldest first.
    #[must_use]
    pub fn list(&self) -> Vec<Reservation> {
        self.book.list()
    }
}

#[cfg(test)]
mod tests {
    use jiff::{
        Timestamp,
        civil::{date, time},
    };
    use storefront::{
        catering::{CateringMenu, Fulfilment},
        storage::MemoryKeyValueStore,
    };
    use testresult::TestResult;

    use crate::{
        auth::{AuthUser, MockAuthProvider, UserId},
        domain::profiles::{MockProfilesService, records::UserProfile},
    };

    use super::*;

    fn request(menu: CateringMenu, guests: u32) -> ReservationRequest {
        ReservationRequest {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "555-0100".to_string(),
            date: date(2026, 12, 5),
            time: time(19, 0, 0, 0),
            guests,
            menu,
            occasion: "Anniversary".to_string(),
            delivery: Fulfilment::Delivery,
            requests: String::new(),
        }
    }

    fn service(role: Option<Role>) -> CateringService {
        let user = AuthUser {
            id: UserId::new(),
            email: "asha@example.com".to_string(),
        };

        let mut auth = MockAuthProvider::new();
        let mut profiles = MockProfilesService::new();

        auth.expect_current_user()
            .returning(move || Some(user.clone()));

        profiles.expect_get_profile().returning(move |id| {
            role.map(|role| UserProfile {
                id,
                email: "asha@example.com".to_string(),
                role,
                name: "Asha".to_string(),
                address: "Pune".to_string(),
                created_at: Timestamp::UNIX_EPOCH,
            })
            .ok_or(ProfilesServiceError::NotFound)
        });

        CateringService::new(
            Arc::new(auth),
            Arc::new(profiles),
            ReservationBook::new(Arc::new(MemoryKeyValueStore::new())),
        )
    }

    #[tokio::test]
    async fn users_can_submit_requests() -> TestResult {
        let catering = service(Some(Role::User));

        let reservation = catering.submit(request(CateringMenu::Buffet, 40)).await?;

        assert_eq!(reservation.name, "Asha Rao");
        assert_eq!(catering.list(), vec![reservation]);

        Ok(())
    }

    #[tokio::test]
    async fn small_parties_are_rejected_and_not_stored() {
        let catering = service(Some(Role::User));

        let result = catering.submit(request(CateringMenu::Plated, 10)).await;

        assert!(
            matches!(
                result,
                Err(CateringError::BelowMinimumGuests {
                    minimum: 25,
                    guests: 10,
                    ..
                })
            ),
            "expected BelowMinimumGuests, got {result:?}"
        );
        assert!(catering.list().is_empty());
    }

    #[tokio::test]
    async fn admins_cannot_submit_requests() {
        let catering = service(Some(Role::Admin));

        let result = catering.submit(request(CateringMenu::Buffet, 40)).await;

        assert!(matches!(result, Err(CateringError::UserRoleRequired)));
    }

    #[tokio::test]
    async fn users_without_a_profile_cannot_submit_requests() {
        let catering = service(None);

        let result = catering.submit(request(CateringMenu::Buffet, 40)).await;

        assert!(matches!(result, Err(CateringError::UserRoleRequired)));
    }

    #[tokio::test]
    async fn signed_out_requests_are_rejected() {
        let mut auth = MockAuthProvider::new();

        auth.expect_current_user().returning(|| None);

        let catering = CateringService::new(
            Arc::new(auth),
            Arc::new(MockProfilesService::new()),
            ReservationBook::new(Arc::new(MemoryKeyValueStore::new())),
        );

        let result = catering.submit(request(CateringMenu::Buffet, 40)).await;

        assert!(matches!(result, Err(CateringError::NotAuthenticated)));
    }
}
