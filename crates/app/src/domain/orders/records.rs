//! Order Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use storefront::{orders::OrderStatus, prices::Price, uuids::TypedUuid};

use crate::{auth::UserId, domain::products::records::ProductId};

/// Order id
pub type OrderId = TypedUuid<OrderRecord>;

const fn one() -> u32 {
    1
}

/// Stored shape of an `orders` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub user_id: UserId,
    pub user_email: String,
    pub product_name: String,
    pub total_price: Price,
    pub status: OrderStatus,
    #[serde(with = "jiff::fmt::serde::timestamp::millisecond::required")]
    pub placed_at: Timestamp,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default = "one")]
    pub quantity: u32,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub buyer_id: UserId,
    pub buyer_email: String,
    pub product_name: String,
    pub total_price: Price,
    pub status: OrderStatus,
    pub placed_at: Timestamp,
    pub product_id: Option<ProductId>,
    pub quantity: u32,
}

impl Order {
    pub(crate) fn from_record(id: OrderId, record: OrderRecord) -> Self {
        Self {
            id,
            buyer_id: record.user_id,
            buyer_email: record.user_email,
            product_name: record.product_name,
            total_price: record.total_price,
            status: record.status,
            placed_at: record.placed_at,
            product_id: record.product_id,
            quantity: record.quantity,
        }
    }
}
