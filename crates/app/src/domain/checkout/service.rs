//! Checkout service.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::{info, warn};

use crate::{
    auth::AuthProvider,
    documents::{DocumentStore, WriteBatch},
    domain::{
        carts::CartSession,
        checkout::errors::CheckoutError,
        orders::{data::NewOrder, records::OrderId},
    },
};

/// Holds the single-flight flag for the lifetime of one checkout.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct CheckoutService {
    documents: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
    cart: Arc<CartSession>,
    in_flight: AtomicBool,
}

impl CheckoutService {
    #[must_use]
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        cart: Arc<CartSession>,
    ) -> Self {
        Self {
            documents,
            auth,
            cart,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Place one order per cart line item and empty the cart.
    ///
    /// Orders are written in one batch: either all of them exist afterwards
    /// or none do, and on failure the cart is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InFlight`] while another checkout runs,
    /// [`CheckoutError::NotAuthenticated`] without a session,
    /// [`CheckoutError::EmptyCart`] when there is nothing to order, or
    /// [`CheckoutError::Commit`] when the batch is rejected.
    pub async fn checkout(&self) -> Result<Vec<OrderId>, CheckoutError> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            return Err(CheckoutError::InFlight);
        };

        let user = self
            .auth
            .current_user()
            .ok_or(CheckoutError::NotAuthenticated)?;

        let items = self.cart.items();

        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut batch = WriteBatch::new();

        let ids = items
            .iter()
            .map(|item| NewOrder::placed(&user, &item.name, item.unit_price).stage(&mut batch))
            .collect::<Result<Vec<_>, _>>()
            .map_err(CheckoutError::Commit)?;

        self.documents
            .commit(batch)
            .await
            .map_err(CheckoutError::Commit)?;

        info!(user = %user.id, orders = ids.len(), "checked out");

        // The orders exist now; a local failure must not invite a second checkout.
        if let Err(error) = self.cart.clear() {
            warn!(user = %user.id, %error, "placed orders but failed to clear cart");
        }

        Ok(ids)
    }
}
