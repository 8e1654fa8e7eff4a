//! Catering errors.

use storefront::{
    catering::{CateringMenu, ReservationError},
    storage::KeyValueError,
};
use thiserror::Error;

use crate::domain::profiles::ProfilesServiceError;

#[derive(Debug, Error)]
pub enum CateringError {
    #[error("sign in to request catering")]
    NotAuthenticated,

    #[error("catering requests are only taken from user accounts")]
    UserRoleRequired,

    #[error("a reservation needs at least one guest")]
    NoGuests,

    #[error("{menu} catering requires a minimum of {minimum} guests, got {guests}")]
    BelowMinimumGuests {
        menu: CateringMenu,
        minimum: u32,
        guests: u32,
    },

    #[error("failed to store reservation")]
    Storage(#[source] KeyValueError),

    #[error("stored reservations are unreadable; refusing to overwrite them")]
    Malformed(#[source] serde_json::Error),

    #[error("failed to load profile")]
    Profiles(#[source] ProfilesServiceError),
}

impl From<ReservationError> for CateringError {
    fn from(error: ReservationError) -> Self {
        match error {
            ReservationError::NoGuests => Self::NoGuests,
            ReservationError::BelowMinimumGuests {
                menu,
                minimum,
                guests,
            } => Self::BelowMinimumGuests {
                menu,
                minimum,
                guests,
            },
            ReservationError::Storage(error) => Self::Storage(error),
            ReservationError::Malformed(error) => Self::Malformed(error),
        }
    }
}
