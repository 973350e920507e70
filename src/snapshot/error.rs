//! Snapshot error types.

use crate::core::Uid;
use crate::store::StoreError;
use thiserror::Error;

/// Failures while taking, encoding or restoring a store snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("could not encode store snapshot: {0}")]
    SerializationFailed(String),

    #[error("could not decode store snapshot: {0}")]
    DeserializationFailed(String),

    /// Written by a newer (or older) release with a different entry layout.
    #[error("store snapshot has format version {found}, this build reads version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("store snapshot lists uid '{uid}' more than once")]
    DuplicateUid { uid: Uid },

    #[error("store snapshot entry for uid '{uid}' is unusable: {reason}")]
    InvalidEntry { uid: Uid, reason: &'static str },

    #[error("could not read the store while taking a snapshot")]
    Store(#[from] StoreError),
}
