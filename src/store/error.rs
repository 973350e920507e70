//! State store error types.

use crate::core::Uid;
use std::time::Duration;
use thiserror::Error;

/// Failures reported by a [`StateStore`](super::StateStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend did not answer in time
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// The backend could not be reached
    #[error("store connection failed: {0}")]
    Connection(String),

    /// The stored value could not be decoded as a state
    #[error("stored state for '{uid}' is corrupted: {reason}")]
    Corrupted { uid: Uid, reason: String },

    /// A writer panicked while holding the store lock
    #[error("store lock poisoned by a panicked writer")]
    Poisoned,

    /// Any other backend-specific failure
    #[error("store backend failed")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}
