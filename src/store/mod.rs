//! Per-identity state storage.
//!
//! An identity-scoped engine keeps the last state of every machine in a
//! [`StateStore`]. [`MemoryStore`] is the default backend; anything else
//! (a network cache, a database table) plugs in by implementing the trait.
//! Backends report their own failures as [`StoreError`], which the engine
//! surfaces to the caller unchanged.

mod error;
mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;

use crate::core::{State, Uid};
use std::sync::Arc;

/// Mapping from machine identity to its last known state.
///
/// `set(uid, None)` records that the machine is back at its default state.
/// `get` returns `None` both for such entries and for identities never seen.
///
/// Stores do not validate uids. The engines only pass uids produced by
/// [`IntoUid`](crate::core::IntoUid); code that calls a store directly must
/// convert its uids the same way, otherwise the store can hold a NaN uid that
/// no engine call will accept.
pub trait StateStore: Send + Sync {
    /// Last recorded state for `uid`.
    fn get(&self, uid: &Uid) -> Result<Option<State>, StoreError>;

    /// Record `state` as the last state for `uid`, creating the entry if needed.
    fn set(&self, uid: &Uid, state: Option<State>) -> Result<(), StoreError>;

    /// Forget `uid` entirely. Deleting an unknown uid is not an error.
    fn delete(&self, uid: &Uid) -> Result<(), StoreError>;
}

impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    fn get(&self, uid: &Uid) -> Result<Option<State>, StoreError> {
        (**self).get(uid)
    }

    fn set(&self, uid: &Uid, state: Option<State>) -> Result<(), StoreError> {
        (**self).set(uid, state)
    }

    fn delete(&self, uid: &Uid) -> Result<(), StoreError> {
        (**self).delete(uid)
    }
}

impl<T: StateStore + ?Sized> StateStore for Box<T> {
    fn get(&self, uid: &Uid) -> Result<Option<State>, StoreError> {
        (**self).get(uid)
    }

    fn set(&self, uid: &Uid, state: Option<State>) -> Result<(), StoreError> {
        (**self).set(uid, state)
    }

    fn delete(&self, uid: &Uid) -> Result<(), StoreError> {
        (**self).delete(uid)
    }
}
