//! Mirror sync status.

use jiff::Timestamp;

/// Outcome of the most recent background mirror push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing pushed yet.
    #[default]
    Idle,

    /// A push is in flight.
    Pending,

    /// The latest cart reached the mirror.
    Synced { at: Timestamp },

    /// The latest push failed; it is not retried.
    Failed { reason: String },
}

impl SyncStatus {
    /// Whether no push is in flight.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, SyncStatus::Pending)
    }
}
