//! Orders Data

use serde::Serialize;
use storefront::{orders::OrderStatus, prices::Price};

use crate::{
    auth::{AuthUser, UserId},
    documents::{DocumentStoreError, ORDERS, WriteBatch, encode},
    domain::{orders::records::OrderId, products::records::ProductId},
};

/// Stored shape of a new order. `placedAt` is stamped by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: UserId,
    pub user_email: String,
    pub product_name: String,
    pub total_price: Price,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub quantity: u32,
}

impl NewOrder {
    /// A freshly placed order for `buyer`.
    #[must_use]
    pub fn placed(buyer: &AuthUser, product_name: &str, total_price: Price) -> Self {
        Self {
            user_id: buyer.id,
            user_email: buyer.email.clone(),
            product_name: product_name.to_string(),
            total_price,
            status: OrderStatus::Placed,
            product_id: None,
            quantity: 1,
        }
    }

    /// Stage this order in `batch` under a new id.
    ///
    /// # Errors
    ///
    /// Returns an error when the order cannot be encoded.
    pub fn stage(&self, batch: &mut WriteBatch) -> Result<OrderId, DocumentStoreError> {
        let id = OrderId::new();

        batch.set_stamped(ORDERS, &id.to_string(), encode(self)?, "placedAt");

        Ok(id)
    }
}
