//! Product Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use storefront::{prices::Price, uuids::TypedUuid};

use crate::auth::UserId;

/// Product id
pub type ProductId = TypedUuid<ProductRecord>;

/// Stored shape of a `products` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub user_id: UserId,
    pub user_email: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(with = "jiff::fmt::serde::timestamp::millisecond::required")]
    pub created_at: Timestamp,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub owner_id: UserId,
    pub owner_email: String,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub created_at: Timestamp,
}

impl Product {
    pub(crate) fn from_record(id: ProductId, record: ProductRecord) -> Self {
        Self {
            id,
            owner_id: record.user_id,
            owner_email: record.user_email,
            name: record.name,
            description: record.description,
            price: record.price,
            created_at: record.created_at,
        }
    }
}
