//! Products Data

use serde::Serialize;
use storefront::prices::Price;

use crate::auth::UserId;

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: u64,
}

/// Stored shape of a new product. `createdAt` is stamped by the store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewProductRecord<'a> {
    pub user_id: UserId,
    pub user_email: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub price: Price,
}
