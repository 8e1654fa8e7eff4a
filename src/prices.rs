//! Prices

use std::{iter::Sum, ops::Deref};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Represents a price in the smallest currency unit (paise, pence, cents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    value: u64,
}

impl Price {
    /// Creates a new Price
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Price { value }
    }

    /// Price multiplied by a quantity, saturating at `u64::MAX`.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Price {
            value: self.value.saturating_mul(u64::from(quantity)),
        }
    }

    /// Format this price in the given currency.
    #[must_use]
    pub fn format(self, currency: &'static Currency) -> String {
        match i64::try_from(self.value) {
            Ok(minor) => Money::from_minor(minor, currency).to_string(),
            Err(_overflow) => format!("{} {}", self.value, currency.iso_alpha_code),
        }
    }
}

impl Deref for Price {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl From<u64> for Price {
    fn from(value: u64) -> Self {
        Price::new(value)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Price::new(iter.fold(0_u64, |total, price| total.saturating_add(price.value)))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{INR, USD};

    use super::*;

    #[test]
    fn new_price() {
        let price = Price::new(1000);

        assert_eq!(price.value, 1000);
    }

    #[test]
    fn price_derefs_to_u64() {
        let price = Price { value: 100 };

        assert_eq!(*price, 100);
    }

    #[test]
    fn sum_saturates_instead_of_overflowing() {
        let total: Price = [Price::new(u64::MAX), Price::new(1)].into_iter().sum();

        assert_eq!(*total, u64::MAX);
    }

    #[test]
    fn times_multiplies_by_quantity() {
        assert_eq!(Price::new(250).times(3), Price::new(750));
    }

    #[test]
    fn format_uses_currency_minor_units() {
        let formatted = Price::new(1_050).format(USD);

        assert_eq!(formatted, "$10.50");
    }

    #[test]
    fn format_includes_currency_symbol() {
        let formatted = Price::new(12_000).format(INR);

        assert!(formatted.contains('₹'), "expected rupee symbol in {formatted}");
    }
}
