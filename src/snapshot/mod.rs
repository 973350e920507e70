//! Snapshot and restore for the in-memory store.
//!
//! A [`StoreSnapshot`] captures every identity and its last state so a
//! process can be restarted without losing where each machine was. Handlers
//! are code and are not part of a snapshot; restore the store, then build
//! the engine around it as usual.

use crate::core::{State, Uid};
use crate::store::MemoryStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// One identity and its last recorded state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub uid: Uid,
    /// `None` when the machine was back at its default state
    pub state: Option<State>,
}

/// Serializable copy of a [`MemoryStore`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    pub entries: Vec<SnapshotEntry>,
}

impl StoreSnapshot {
    /// Check the format version, that every value is usable and that no uid
    /// appears twice.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let mut seen = HashSet::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !entry.uid.is_valid() {
                return Err(SnapshotError::InvalidEntry {
                    uid: entry.uid.clone(),
                    reason: "uid is NaN",
                });
            }
            if entry.state.as_ref().is_some_and(|s| !s.is_valid()) {
                return Err(SnapshotError::InvalidEntry {
                    uid: entry.uid.clone(),
                    reason: "state is NaN",
                });
            }
            if !seen.insert(&entry.uid) {
                return Err(SnapshotError::DuplicateUid {
                    uid: entry.uid.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Decode and validate a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Decode and validate a binary snapshot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

impl MemoryStore {
    /// Capture the current contents of the store.
    pub fn snapshot(&self) -> Result<StoreSnapshot, SnapshotError> {
        let entries: Vec<SnapshotEntry> = self
            .entries()?
            .into_iter()
            .map(|(uid, state)| SnapshotEntry { uid, state })
            .collect();

        let snapshot = StoreSnapshot {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4().to_string(),
            taken_at: Utc::now(),
            entries,
        };
        debug!(id = %snapshot.id, entries = snapshot.entries.len(), "took store snapshot");
        Ok(snapshot)
    }

    /// Build a new store holding exactly the snapshot's entries.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        debug!(id = %snapshot.id, entries = snapshot.entries.len(), "restoring store snapshot");
        Ok(Self::from_entries(
            snapshot
                .entries
                .into_iter()
                .map(|entry| (entry.uid, entry.state)),
        ))
    }
}
