//! Identity-scoped dispatch: the engine remembers each machine's state.

use crate::core::{HandlerResult, IntoState, IntoUid, State, Uid};
use crate::engine::StateEngine;
use crate::error::Result;
use crate::store::{MemoryStore, StateStore};
use tracing::{debug, instrument};

/// Finite state machines keyed by identity, with their states kept in a
/// [`StateStore`].
///
/// Callers pass a uid and an input; the engine looks up the machine's last
/// state, dispatches it and records the result. A machine that was never
/// driven, or whose last handler returned nothing, starts from the default
/// state.
///
/// Calls for different uids are independent. Two concurrent calls for the
/// *same* uid race on the store (the last write wins); callers that need
/// ordering per uid must serialize those calls themselves.
///
/// # Example
///
/// ```rust
/// use statewheel::IntegratedStateEngine;
///
/// let mut engine = IntegratedStateEngine::<&str>::new();
/// engine
///     .register_default("locked", |input| {
///         Ok(Some(if input == "coin" { "unlocked" } else { "locked" }.into()))
///     })
///     .unwrap();
/// engine
///     .register_state("unlocked", |input| {
///         Ok(Some(if input == "push" { "locked" } else { "unlocked" }.into()))
///     })
///     .unwrap();
///
/// assert_eq!(engine.execute("gate-1", "coin").unwrap(), Some("unlocked".into()));
/// assert_eq!(engine.execute("gate-2", "push").unwrap(), Some("locked".into()));
/// assert_eq!(engine.execute("gate-1", "push").unwrap(), Some("locked".into()));
/// ```
pub struct IntegratedStateEngine<I, St = MemoryStore> {
    engine: StateEngine<I>,
    store: St,
}

impl<I> IntegratedStateEngine<I, MemoryStore> {
    /// Engine backed by a fresh [`MemoryStore`].
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl<I> Default for IntegratedStateEngine<I, MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, St: StateStore> IntegratedStateEngine<I, St> {
    pub fn with_store(store: St) -> Self {
        Self::from_parts(StateEngine::new(), store)
    }

    pub fn from_parts(engine: StateEngine<I>, store: St) -> Self {
        Self { engine, store }
    }

    pub fn engine(&self) -> &StateEngine<I> {
        &self.engine
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn into_parts(self) -> (StateEngine<I>, St) {
        (self.engine, self.store)
    }

    pub fn register<S, F>(&mut self, states: S, handler: F, default: bool) -> Result<()>
    where
        S: IntoIterator,
        S::Item: IntoState,
        F: Fn(I) -> HandlerResult + Send + Sync + 'static,
    {
        self.engine.register(states, handler, default)
    }

    pub fn register_state<S, F>(&mut self, state: S, handler: F) -> Result<()>
    where
        S: IntoState,
        F: Fn(I) -> HandlerResult + Send + Sync + 'static,
    {
        self.engine.register_state(state, handler)
    }

    pub fn register_default<S, F>(&mut self, state: S, handler: F) -> Result<()>
    where
        S: IntoState,
        F: Fn(I) -> HandlerResult + Send + Sync + 'static,
    {
        self.engine.register_default(state, handler)
    }

    /// Drive the machine identified by `uid` from its stored state.
    pub fn execute(&self, uid: impl IntoUid, input: I) -> Result<Option<State>> {
        let uid = uid.into_uid()?;
        self.run(&uid, None, input)
    }

    /// Drive the machine identified by `uid` from `state`, ignoring whatever
    /// the store holds for it. The result is stored as usual.
    pub fn execute_from(
        &self,
        uid: impl IntoUid,
        state: impl IntoState,
        input: I,
    ) -> Result<Option<State>> {
        let uid = uid.into_uid()?;
        let state = state.into_state()?;
        self.run(&uid, Some(state), input)
    }

    /// Last stored state of `uid`; `None` means the next call starts at default.
    pub fn state_of(&self, uid: impl IntoUid) -> Result<Option<State>> {
        let uid = uid.into_uid()?;
        Ok(self.store.get(&uid)?)
    }

    /// Forget `uid`, so its next call starts at the default state.
    pub fn reset(&self, uid: impl IntoUid) -> Result<()> {
        let uid = uid.into_uid()?;
        self.store.delete(&uid)?;
        Ok(())
    }

    #[instrument(skip_all, fields(uid = %uid))]
    fn run(&self, uid: &Uid, state_override: Option<State>, input: I) -> Result<Option<State>> {
        let state = match state_override {
            Some(state) => Some(state),
            None => self.store.get(uid)?,
        };

        let next = self.engine.dispatch(state.as_ref(), input, Some(uid))?;

        debug!(from = ?state, to = ?next, "machine transitioned");
        self.store.set(uid, next.clone())?;
        Ok(next)
    }
}

impl<I, St: std::fmt::Debug> std::fmt::Debug for IntegratedStateEngine<I, St> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegratedStateEngine")
            .field("engine", &self.engine)
            .field("store", &self.store)
            .finish()
    }
}
