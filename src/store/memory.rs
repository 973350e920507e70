//! In-memory state store.

use super::{StateStore, StoreError};
use crate::core::{State, Uid};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::trace;

/// Storage data: uid -> last state (`None` once a machine returned to default)
type StoreData = HashMap<Uid, Option<State>>;

/// Process-lifetime store backed by a hash map. No eviction.
///
/// Clones share the same underlying map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<StoreData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an entry exists for `uid`, even one recording the default state.
    pub fn contains(&self, uid: &Uid) -> Result<bool, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::Poisoned)?;
        Ok(data.contains_key(uid))
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::Poisoned)?;
        Ok(data.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    pub(crate) fn entries(&self) -> Result<Vec<(Uid, Option<State>)>, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::Poisoned)?;
        Ok(data
            .iter()
            .map(|(uid, state)| (uid.clone(), state.clone()))
            .collect())
    }

    pub(crate) fn from_entries(entries: impl IntoIterator<Item = (Uid, Option<State>)>) -> Self {
        Self {
            data: Arc::new(RwLock::new(entries.into_iter().collect())),
        }
    }
}

impl StateStore for MemoryStore {
    fn get(&self, uid: &Uid) -> Result<Option<State>, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::Poisoned)?;
        Ok(data.get(uid).cloned().flatten())
    }

    fn set(&self, uid: &Uid, state: Option<State>) -> Result<(), StoreError> {
        trace!(uid = %uid, state = ?state, "storing state");
        let mut data = self.data.write().map_err(|_| StoreError::Poisoned)?;
        data.insert(uid.clone(), state);
        Ok(())
    }

    fn delete(&self, uid: &Uid) -> Result<(), StoreError> {
        trace!(uid = %uid, "deleting state");
        let mut data = self.data.write().map_err(|_| StoreError::Poisoned)?;
        data.remove(uid);
        Ok(())
    }
}
