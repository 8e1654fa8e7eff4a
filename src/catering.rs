//! Catering Reservations
//!
//! Reservations are validated against the per-menu guest minimums and stored
//! as a JSON array in the local key-value store.

use std::{fmt, sync::Arc};

use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{KeyValueError, KeyValueStore};

/// Storage key holding the JSON-encoded reservations.
pub const RESERVATIONS_STORAGE_KEY: &str = "reservations";

/// Catering menu style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CateringMenu {
    /// Plated service.
    Plated,

    /// Buffet service.
    Buffet,

    /// Family-style service.
    FamilyStyle,

    /// Any other menu, with no guest minimum.
    Other(String),
}

impl CateringMenu {
    /// Smallest party the menu can be booked for, if it has one.
    #[must_use]
    pub const fn minimum_guests(&self) -> Option<u32> {
        match self {
            CateringMenu::Plated => Some(25),
            CateringMenu::Buffet => Some(20),
            CateringMenu::FamilyStyle => Some(15),
            CateringMenu::Other(_) => None,
        }
    }

    /// Name used in storage.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            CateringMenu::Plated => "plated",
            CateringMenu::Buffet => "buffet",
            CateringMenu::FamilyStyle => "family-style",
            CateringMenu::Other(name) => name,
        }
    }
}

impl From<String> for CateringMenu {
    fn from(value: String) -> Self {
        match value.as_str() {
            "plated" => CateringMenu::Plated,
            "buffet" => CateringMenu::Buffet,
            "family-style" => CateringMenu::FamilyStyle,
            _ => CateringMenu::Other(value),
        }
    }
}

impl From<&str> for CateringMenu {
    fn from(value: &str) -> Self {
        CateringMenu::from(value.to_string())
    }
}

impl From<CateringMenu> for String {
    fn from(menu: CateringMenu) -> Self {
        match menu {
            CateringMenu::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CateringMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the food reaches the party.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fulfilment {
    /// Collected by the customer.
    #[default]
    Pickup,

    /// Delivered to the venue.
    Delivery,
}

/// Review state of a stored reservation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Awaiting review.
    #[default]
    Submitted,
}

/// A catering request as entered by the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    /// Customer first name.
    pub first_name: String,

    /// Customer last name.
    pub last_name: String,

    /// Contact email.
    pub email: String,

    /// Contact phone number.
    pub phone: String,

    /// Event date.
    pub date: Date,

    /// Event time.
    pub time: Time,

    /// Party size.
    pub guests: u32,

    /// Requested menu.
    pub menu: CateringMenu,

    /// Occasion, free text.
    pub occasion: String,

    /// Pickup or delivery.
    pub delivery: Fulfilment,

    /// Special requests, free text.
    pub requests: String,
}

impl ReservationRequest {
    /// Check the party size against the menu.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::NoGuests`] for an empty party, or
    /// [`ReservationError::BelowMinimumGuests`] when the menu needs more guests.
    pub fn validate(&self) -> Result<(), ReservationError> {
        if self.guests == 0 {
            return Err(ReservationError::NoGuests);
        }

        match self.menu.minimum_guests() {
            Some(minimum) if self.guests < minimum => Err(ReservationError::BelowMinimumGuests {
                menu: self.menu.clone(),
                minimum,
                guests: self.guests,
            }),
            _ => Ok(()),
        }
    }
}

/// A stored reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Full name, `first last`.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Contact phone number.
    pub phone: String,

    /// Event date.
    pub date: Date,

    /// Event time.
    pub time: Time,

    /// Party size.
    pub guests: u32,

    /// Requested menu.
    pub menu: CateringMenu,

    /// Occasion, free text.
    pub occasion: String,

    /// Pickup or delivery.
    pub pickup_or_delivery: Fulfilment,

    /// Special requests, free text.
    pub requests: String,

    /// Review state.
    pub status: ReservationStatus,
}

impl From<ReservationRequest> for Reservation {
    fn from(request: ReservationRequest) -> Self {
        Self {
            name: format!("{} {}", request.first_name, request.last_name),
            email: request.email,
            phone: request.phone,
            date: request.date,
            time: request.time,
            guests: request.guests,
            menu: request.menu,
            occasion: request.occasion,
            pickup_or_delivery: request.delivery,
            requests: request.requests,
            status: ReservationStatus::Submitted,
        }
    }
}

/// Errors raised when recording a reservation.
#[derive(Debug, Error)]
pub enum ReservationError {
    /// The party has no guests.
    #[error("a reservation needs at least one guest")]
    NoGuests,

    /// The party is too small for the menu.
    #[error("{menu} catering requires a minimum of {minimum} guests, got {guests}")]
    BelowMinimumGuests {
        /// Requested menu.
        menu: CateringMenu,

        /// Minimum party size for the menu.
        minimum: u32,

        /// Requested party size.
        guests: u32,
    },

    /// The reservations could not be persisted.
    #[error("failed to persist reservations")]
    Storage(#[from] KeyValueError),

    /// The stored reservations could not be parsed, so appending would
    /// overwrite them.
    #[error("stored reservations are unreadable")]
    Malformed(#[source] serde_json::Error),
}

/// Reservations persisted under [`RESERVATIONS_STORAGE_KEY`].
#[derive(Debug, Clone)]
pub struct ReservationBook {
    storage: Arc<dyn KeyValueStore>,
}

impl ReservationBook {
    /// Create a reservation book over the given storage.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// All stored reservations, oldest first.
    ///
    /// A missing or malformed value reads as no reservations.
    pub fn list(&self) -> Vec<Reservation> {
        self.stored().unwrap_or_else(|error| {
            warn!("ignoring malformed reservations: {error}");

            Vec::new()
        })
    }

    fn stored(&self) -> Result<Vec<Reservation>, ReservationError> {
        let Some(raw) = self.storage.get(RESERVATIONS_STORAGE_KEY) else {
            return Ok(Vec::new());
        };

        serde_json::from_str::<Option<Vec<Reservation>>>(&raw)
            .map(Option::unwrap_or_default)
            .map_err(ReservationError::Malformed)
    }

    /// Validate and append a reservation.
    ///
    /// # Errors
    ///
    /// Returns a validation error without touching storage,
    /// [`ReservationError::Malformed`] when the stored reservations cannot be
    /// parsed, or [`ReservationError::Storage`] when the reservations cannot be
    /// persisted.
    pub fn record(&self, request: ReservationRequest) -> Result<Reservation, ReservationError> {
        request.validate()?;

        let reservation = Reservation::from(request);

        let mut reservations = self.stored()?;

        reservations.push(reservation.clone());

        let encoded = serde_json::to_string(&reservations).map_err(KeyValueError::from)?;

        self.storage.set(RESERVATIONS_STORAGE_KEY, &encoded)?;

        debug!(
            guests = reservation.guests,
            menu = %reservation.menu,
            "recorded catering reservation"
        );

        Ok(reservation)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};
    use testresult::TestResult;

    use crate::storage::MemoryKeyValueStore;

    use super::*;

    fn request(menu: CateringMenu, guests: u32) -> ReservationRequest {
        ReservationRequest {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "555-0100".to_string(),
            date: date(2026, 11, 14),
            time: time(18, 30, 0, 0),
            guests,
            menu,
            occasion: "Birthday".to_string(),
            delivery: Fulfilment::Delivery,
            requests: "No peanuts".to_string(),
        }
    }

    fn book() -> (Arc<MemoryKeyValueStore>, ReservationBook) {
        let storage = Arc::new(MemoryKeyValueStore::new());

        (storage.clone(), ReservationBook::new(storage))
    }

    #[test]
    fn menu_minimums() {
        assert_eq!(CateringMenu::Plated.minimum_guests(), Some(25));
        assert_eq!(CateringMenu::Buffet.minimum_guests(), Some(20));
        assert_eq!(CateringMenu::FamilyStyle.minimum_guests(), Some(15));
        assert_eq!(CateringMenu::from("tasting").minimum_guests(), None);
    }

    #[test]
    fn menu_names_round_trip_through_strings() {
        for name in ["plated", "buffet", "family-style", "tasting"] {
            assert_eq!(String::from(CateringMenu::from(name)), name);
        }
    }

    #[test]
    fn rejects_parties_below_the_menu_minimum() {
        let result = request(CateringMenu::Plated, 24).validate();

        assert!(
            matches!(
                result,
                Err(ReservationError::BelowMinimumGuests {
                    minimum: 25,
                    guests: 24,
                    ..
                })
            ),
            "expected BelowMinimumGuests, got {result:?}"
        );
    }

    #[test]
    fn accepts_parties_at_the_menu_minimum() -> TestResult {
        request(CateringMenu::Buffet, 20).validate()?;
        request(CateringMenu::FamilyStyle, 15).validate()?;

        Ok(())
    }

    #[test]
    fn other_menus_have_no_minimum() -> TestResult {
        request(CateringMenu::from("tasting"), 2).validate()?;

        Ok(())
    }

    #[test]
    fn rejects_empty_parties() {
        let result = request(CateringMenu::from("tasting"), 0).validate();

        assert!(matches!(result, Err(ReservationError::NoGuests)));
    }

    #[test]
    fn recorded_reservation_joins_names_and_is_submitted() -> TestResult {
        let (_, book) = book();

        let reservation = book.record(request(CateringMenu::Buffet, 40))?;

        assert_eq!(reservation.name, "Asha Rao");
        assert_eq!(reservation.status, ReservationStatus::Submitted);
        assert_eq!(book.list(), vec![reservation]);

        Ok(())
    }

    #[test]
    fn stored_shape_uses_pickup_or_delivery_key() -> TestResult {
        let (storage, book) = book();

        book.record(request(CateringMenu::FamilyStyle, 15))?;

        let raw = storage.get(RESERVATIONS_STORAGE_KEY).unwrap_or_default();
        let stored: serde_json::Value = serde_json::from_str(&raw)?;

        assert_eq!(stored.pointer("/0/pickupOrDelivery"), Some(&"delivery".into()));
        assert_eq!(stored.pointer("/0/menu"), Some(&"family-style".into()));
        assert_eq!(stored.pointer("/0/status"), Some(&"submitted".into()));

        Ok(())
    }

    #[test]
    fn invalid_reservation_is_not_stored() {
        let (storage, book) = book();

        let result = book.record(request(CateringMenu::Plated, 10));

        assert!(result.is_err());
        assert_eq!(storage.get(RESERVATIONS_STORAGE_KEY), None);
    }

    #[test]
    fn reservations_accumulate_in_order() -> TestResult {
        let (_, book) = book();

        book.record(request(CateringMenu::Buffet, 20))?;
        book.record(request(CateringMenu::Plated, 30))?;

        let guests: Vec<u32> = book.list().iter().map(|reservation| reservation.guests).collect();

        assert_eq!(guests, vec![20, 30]);

        Ok(())
    }

    #[test]
    fn unreadable_reservations_are_not_overwritten() -> TestResult {
        let (storage, book) = book();

        let existing = r#"[{"name":"Ravi Iyer","email":"ravi@example.com","phone":"555-0199","date":"","time":"19:00","guests":40,"menu":"buffet","occasion":"","pickupOrDelivery":"pickup","requests":"","status":"submitted"}]"#;

        storage.set(RESERVATIONS_STORAGE_KEY, existing)?;

        let result = book.record(request(CateringMenu::Buffet, 30));

        assert!(
            matches!(result, Err(ReservationError::Malformed(_))),
            "expected Malformed, got {result:?}"
        );
        assert_eq!(
            storage.get(RESERVATIONS_STORAGE_KEY).as_deref(),
            Some(existing)
        );
        assert!(book.list().is_empty());

        Ok(())
    }
}
