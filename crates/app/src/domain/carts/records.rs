//! Cart Records

use serde::{Deserialize, Serialize};
use storefront::cart::CartLineItem;

/// Stored shape of a `carts` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRecord {
    #[serde(default)]
    pub items: Vec<CartLineItem>,
}
