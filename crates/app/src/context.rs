//! App Context

use std::sync::Arc;

use rusty_money::iso::Currency;
use storefront::{
    cart::{CartView, LocalCartStore},
    catering::ReservationBook,
    storage::KeyValueStore,
};
use thiserror::Error;
use tracing::debug;

use crate::{
    auth::{AuthProvider, AuthUser, DocumentAuthProvider, SessionStore},
    database::{self, Db},
    documents::{DocumentStore, DocumentStoreError, MemoryDocumentStore, PgDocumentStore},
    domain::{
        carts::{CartSession, RemoteCartMirror},
        catering::CateringService,
        checkout::CheckoutService,
        orders::{DocumentOrdersService, OrdersService},
        products::{DocumentProductsService, ProductsService},
        profiles::{Dashboards, DocumentProfilesService, ProfilesService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),

    #[error("failed to open local documents")]
    LocalDocuments(#[source] DocumentStoreError),
}

/// Every service, built once at startup over one document store and one
/// key-value store.
#[derive(Clone)]
pub struct AppContext {
    pub documents: Arc<dyn DocumentStore>,
    pub storage: Arc<dyn KeyValueStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub sessions: SessionStore,
    pub profiles: Arc<dyn ProfilesService>,
    pub dashboards: Arc<Dashboards>,
    pub products: Arc<dyn ProductsService>,
    pub orders: Arc<dyn OrdersService>,
    pub cart: Arc<CartSession>,
    pub checkout: Arc<CheckoutService>,
    pub catering: Arc<CateringService>,
}

impl AppContext {
    /// Wire every service over the given stores.
    #[must_use]
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        storage: Arc<dyn KeyValueStore>,
        currency: &'static Currency,
    ) -> Self {
        let auth: Arc<dyn AuthProvider> = Arc::new(DocumentAuthProvider::new(documents.clone()));

        let profiles: Arc<dyn ProfilesService> =
            Arc::new(DocumentProfilesService::new(documents.clone(), auth.clone()));

        let products: Arc<dyn ProductsService> =
            Arc::new(DocumentProductsService::new(documents.clone()));

        let orders: Arc<dyn OrdersService> = Arc::new(DocumentOrdersService::new(
            documents.clone(),
            products.clone(),
        ));

        let cart = Arc::new(CartSession::new(
            LocalCartStore::new(storage.clone()),
            CartView::new(currency),
            Arc::new(RemoteCartMirror::new(documents.clone())),
            auth.clone(),
            products.clone(),
        ));

        Self {
            dashboards: Arc::new(Dashboards::new(auth.clone(), profiles.clone())),
            checkout: Arc::new(CheckoutService::new(
                documents.clone(),
                auth.clone(),
                cart.clone(),
            )),
            catering: Arc::new(CateringService::new(
                auth.clone(),
                profiles.clone(),
                ReservationBook::new(storage.clone()),
            )),
            sessions: SessionStore::new(storage.clone()),
            documents,
            storage,
            auth,
            profiles,
            products,
            orders,
            cart,
        }
    }

    /// Build application context over an in-process document store.
    #[must_use]
    pub fn in_memory(storage: Arc<dyn KeyValueStore>, currency: &'static Currency) -> Self {
        Self::new(Arc::new(MemoryDocumentStore::new()), storage, currency)
    }

    /// Build application context whose documents are saved alongside the
    /// cart and session in `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error when the saved documents cannot be read.
    pub fn local(
        storage: Arc<dyn KeyValueStore>,
        currency: &'static Currency,
    ) -> Result<Self, AppInitError> {
        let documents =
            MemoryDocumentStore::persisted(storage.clone()).map_err(AppInitError::LocalDocuments)?;

        Ok(Self::new(Arc::new(documents), storage, currency))
    }

    /// Build application context from a database URL, applying migrations.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating
    /// fails.
    pub async fn from_database_url(
        url: &str,
        storage: Arc<dyn KeyValueStore>,
        currency: &'static Currency,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrate)?;

        Ok(Self::new(
            Arc::new(PgDocumentStore::new(Db::new(pool))),
            storage,
            currency,
        ))
    }

    /// Resume the session persisted by a previous run, if any.
    pub fn resume_session(&self) -> Option<AuthUser> {
        let user = self.sessions.load()?;

        debug!(user = %user.id, "resumed session");

        self.auth.restore(user.clone());

        Some(user)
    }
}
