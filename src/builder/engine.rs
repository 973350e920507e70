//! Builder for constructing engines.

use crate::core::{HandlerResult, IntoState, Registry};
use crate::engine::{IntegratedStateEngine, StateEngine};
use crate::error::Result;
use crate::store::{MemoryStore, StateStore};

/// Builder for constructing engines with a fluent API.
///
/// Registration errors surface from the registering call, so a chain can be
/// written with `?`:
///
/// ```
/// use statewheel::builder::{goto, EngineBuilder};
///
/// # fn main() -> Result<(), statewheel::EngineError> {
/// let engine = EngineBuilder::<()>::new()
///     .default_state("idle", goto("busy"))?
///     .state("busy", goto("idle"))?
///     .build_integrated();
///
/// assert_eq!(engine.execute("worker-1", ())?, Some("busy".into()));
/// # Ok(())
/// # }
/// ```
pub struct EngineBuilder<I> {
    registry: Registry<I>,
}

impl<I> EngineBuilder<I> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Bind a single state.
    pub fn state<S, F>(mut self, state: S, handler: F) -> Result<Self>
    where
        S: IntoState,
        F: Fn(I) -> HandlerResult + Send + Sync + 'static,
    {
        self.registry.register([state], handler, false)?;
        Ok(self)
    }

    /// Bind several states to one handler.
    pub fn states<S, F>(mut self, states: S, handler: F) -> Result<Self>
    where
        S: IntoIterator,
        S::Item: IntoState,
        F: Fn(I) -> HandlerResult + Send + Sync + 'static,
    {
        self.registry.register(states, handler, false)?;
        Ok(self)
    }

    /// Bind the default state.
    pub fn default_state<S, F>(mut self, state: S, handler: F) -> Result<Self>
    where
        S: IntoState,
        F: Fn(I) -> HandlerResult + Send + Sync + 'static,
    {
        self.registry.register([state], handler, true)?;
        Ok(self)
    }

    /// Build a direct engine.
    pub fn build(self) -> StateEngine<I> {
        StateEngine::from_registry(self.registry)
    }

    /// Build an identity-scoped engine backed by a fresh [`MemoryStore`].
    pub fn build_integrated(self) -> IntegratedStateEngine<I, MemoryStore> {
        self.build_with_store(MemoryStore::new())
    }

    /// Build an identity-scoped engine backed by `store`.
    pub fn build_with_store<St: StateStore>(self, store: St) -> IntegratedStateEngine<I, St> {
        IntegratedStateEngine::from_parts(self.build(), store)
    }
}

impl<I> Default for EngineBuilder<I> {
    fn default() -> Self {
        Self::new()
    }
}
