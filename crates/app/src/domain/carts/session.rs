//! Cart session.

use std::sync::Arc;

use storefront::cart::{CartLineItem, CartSummary, CartView, DEFAULT_IMAGE, LocalCartStore};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{
    auth::{AuthProvider, AuthUser, UserId},
    domain::{
        carts::{errors::CartSessionError, mirror::RemoteCartMirror},
        products::{ProductsService, records::ProductId},
    },
};

/// Most units of one product a single `add_product` call may append.
pub const MAX_UNITS_PER_ADD: u32 = 99;

/// The shopper's cart: local persistence, the rendered view and the remote
/// mirror kept in step.
///
/// Every mutation is committed locally first, then rendered, then pushed to
/// the mirror in the background when a user is signed in.
pub struct CartSession {
    store: LocalCartStore,
    view: CartView,
    mirror: Arc<RemoteCartMirror>,
    auth: Arc<dyn AuthProvider>,
    products: Arc<dyn ProductsService>,
}

impl CartSession {
    /// Create a session and render the locally stored cart.
    #[must_use]
    pub fn new(
        store: LocalCartStore,
        view: CartView,
        mirror: Arc<RemoteCartMirror>,
        auth: Arc<dyn AuthProvider>,
        products: Arc<dyn ProductsService>,
    ) -> Self {
        let session = Self {
            store,
            view,
            mirror,
            auth,
            products,
        };

        session.render();

        session
    }

    /// Re-render from local storage.
    pub fn render(&self) -> CartSummary {
        self.view.render(&self.store.read())
    }

    /// The current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.store.read()
    }

    #[must_use]
    pub fn view(&self) -> &CartView {
        &self.view
    }

    #[must_use]
    pub fn mirror(&self) -> &Arc<RemoteCartMirror> {
        &self.mirror
    }

    /// Append one line item.
    ///
    /// # Errors
    ///
    /// Returns [`CartSessionError::Cart`] when local storage rejects the write.
    pub fn add_item(&self, item: CartLineItem) -> Result<CartSummary, CartSessionError> {
        let items = self.store.append(item)?;

        Ok(self.committed(items))
    }

    /// Append `quantity` line items for a catalog product.
    ///
    /// # Errors
    ///
    /// Returns [`CartSessionError::InvalidQuantity`] for zero or more than
    /// [`MAX_UNITS_PER_ADD`], or the product lookup or storage error.
    pub async fn add_product(
        &self,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartSummary, CartSessionError> {
        if !(1..=MAX_UNITS_PER_ADD).contains(&quantity) {
            return Err(CartSessionError::InvalidQuantity);
        }

        let product = self.products.get(product).await?;

        let item = CartLineItem {
            name: product.name,
            unit_price: product.price,
            image_reference: DEFAULT_IMAGE.to_string(),
        };

        let mut items = self.store.read();

        items.extend(std::iter::repeat_n(item, quantity as usize));

        self.store.write(&items)?;

        Ok(self.committed(items))
    }

    /// Remove the line item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartSessionError::Cart`] when `index` is out of range or the
    /// write fails.
    pub fn remove_at(&self, index: usize) -> Result<CartSummary, CartSessionError> {
        let items = self.store.remove_at(index)?;

        Ok(self.committed(items))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartSessionError::Cart`] when local storage rejects the write.
    pub fn clear(&self) -> Result<CartSummary, CartSessionError> {
        self.store.clear()?;

        Ok(self.committed(Vec::new()))
    }

    /// Adopt the mirrored cart of a user who just signed in.
    ///
    /// A non-empty mirror replaces the local cart; an empty or unreadable one
    /// leaves it alone. Either way the cart is re-rendered.
    ///
    /// # Errors
    ///
    /// Returns [`CartSessionError::Cart`] when the mirror cannot be stored
    /// locally.
    pub async fn reconcile(&self, user: &AuthUser) -> Result<CartSummary, CartSessionError> {
        let remote = self.mirror.pull(user.id).await;

        if !remote.is_empty() {
            info!(user = %user.id, items = remote.len(), "restored cart from mirror");

            self.store.write(&remote)?;
        }

        Ok(self.render())
    }

    /// Reconcile on the current session and on every later sign-in.
    pub fn watch_sessions(self: &Arc<Self>) -> JoinHandle<()> {
        let mut sessions = self.auth.subscribe();
        let session = Arc::clone(self);

        tokio::spawn(async move {
            let mut previous: Option<UserId> = None;

            loop {
                let current = sessions.borrow_and_update().clone();

                if let Some(user) = &current
                    && previous != Some(user.id)
                    && let Err(error) = session.reconcile(user).await
                {
                    warn!(user = %user.id, %error, "failed to reconcile cart");
                }

                previous = current.map(|user| user.id);

                if sessions.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    fn committed(&self, items: Vec<CartLineItem>) -> CartSummary {
        let summary = self.view.render(&items);

        if let Some(user) = self.auth.current_user() {
            self.mirror.push_in_background(user.id, items);
        }

        summary
    }
}
