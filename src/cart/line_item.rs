//! Cart Line Items

use serde::{Deserialize, Serialize};

use crate::prices::Price;

/// Image shown for line items added without one.
pub const DEFAULT_IMAGE: &str = "images/default.jpg";

/// One unit of a single product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product display name.
    pub name: String,

    /// Unit price in minor currency units.
    #[serde(rename = "price")]
    pub unit_price: Price,

    /// Image URL or path shown next to the item.
    #[serde(rename = "image", default = "default_image")]
    pub image_reference: String,
}

impl CartLineItem {
    /// Create a line item.
    pub fn new(name: impl Into<String>, unit_price: u64, image_reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit_price: Price::new(unit_price),
            image_reference: image_reference.into(),
        }
    }

    /// Create a line item that uses the default image.
    pub fn without_image(name: impl Into<String>, unit_price: u64) -> Self {
        Self::new(name, unit_price, DEFAULT_IMAGE)
    }
}

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}
