//! Remote cart mirror.

use std::sync::{Arc, Mutex as SyncMutex, PoisonError};

use jiff::Timestamp;
use storefront::cart::CartLineItem;
use tokio::{
    runtime::Handle,
    sync::{Mutex, watch},
    task::JoinHandle,
};
use tracing::{debug, warn};

use crate::{
    auth::UserId,
    documents::{CARTS, DocumentStore, DocumentStoreError, decode, encode},
    domain::carts::{records::CartRecord, sync::SyncStatus},
};

/// Best-effort copy of a signed-in user's cart at `carts/{userId}`.
///
/// Pushes are numbered as they are issued. A push that finds a newer one
/// already applied is dropped, so the mirror never moves backwards.
///
/// `issued` is held whenever the status changes, so only the newest push can
/// settle it.
pub struct RemoteCartMirror {
    documents: Arc<dyn DocumentStore>,
    status: watch::Sender<SyncStatus>,
    issued: SyncMutex<u64>,
    applied: Mutex<u64>,
}

impl RemoteCartMirror {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            documents,
            status: watch::Sender::new(SyncStatus::Idle),
            issued: SyncMutex::new(0),
            applied: Mutex::new(0),
        }
    }

    /// Read the mirrored cart. Missing, unreadable and malformed mirrors all
    /// read as empty.
    pub async fn pull(&self, user: UserId) -> Vec<CartLineItem> {
        match self.documents.get(CARTS, &user.to_string()).await {
            Ok(Some(snapshot)) => match decode::<CartRecord>(&snapshot) {
                Ok(record) => record.items,
                Err(error) => {
                    warn!(%user, %error, "ignoring malformed cart mirror");

                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(%user, %error, "failed to read cart mirror");

                Vec::new()
            }
        }
    }

    /// Overwrite the mirrored cart with `items`.
    ///
    /// # Errors
    ///
    /// Returns the store error when the write fails.
    pub async fn push(&self, user: UserId, items: &[CartLineItem]) -> Result<(), DocumentStoreError> {
        let record = CartRecord {
            items: items.to_vec(),
        };

        self.documents
            .set(CARTS, &user.to_string(), encode(&record)?)
            .await
    }

    /// Push `items` without waiting for the result.
    ///
    /// Failures are logged and reported through [`Self::status`]; they are
    /// never retried. Returns `None` outside a Tokio runtime, in which case
    /// nothing is pushed.
    pub fn push_in_background(
        self: &Arc<Self>,
        user: UserId,
        items: Vec<CartLineItem>,
    ) -> Option<JoinHandle<()>> {
        let Ok(runtime) = Handle::try_current() else {
            warn!(%user, "no runtime available, cart mirror not updated");

            return None;
        };

        let sequence = {
            let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);

            *issued += 1;

            self.status.send_replace(SyncStatus::Pending);

            *issued
        };

        let mirror = Arc::clone(self);

        Some(runtime.spawn(async move { mirror.push_in_order(sequence, user, items).await }))
    }

    async fn push_in_order(&self, sequence: u64, user: UserId, items: Vec<CartLineItem>) {
        let mut applied = self.applied.lock().await;

        if *applied > sequence {
            debug!(%user, sequence, applied = *applied, "skipping superseded cart push");

            return;
        }

        let result = self.push(user, &items).await;

        *applied = sequence;

        let outcome = match result {
            Ok(()) => {
                debug!(%user, sequence, items = items.len(), "mirrored cart");

                SyncStatus::Synced {
                    at: Timestamp::now(),
                }
            }
            Err(error) => {
                warn!(%user, sequence, %error, "failed to mirror cart");

                SyncStatus::Failed {
                    reason: error.to_string(),
                }
            }
        };

        let issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);

        if *issued == sequence {
            self.status.send_replace(outcome);
        }
    }

    /// Observe the outcome of background pushes.
    #[must_use]
    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    /// Wait until no background push is in flight and return the outcome.
    pub async fn settled(&self) -> SyncStatus {
        let mut status = self.status.subscribe();

        status
            .wait_for(SyncStatus::is_settled)
            .await
            .map_or(SyncStatus::Idle, |settled| settled.clone())
    }
}
