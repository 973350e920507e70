//! Direct dispatch: the caller holds the state between calls.

use crate::core::context::ContextGuard;
use crate::core::{Handler, HandlerId, HandlerResult, IntoState, Registry, State, Uid};
use crate::error::{EngineError, Result};
use tracing::{debug, warn};

/// Finite state machine driven by explicit states.
///
/// Each call to [`execute`](StateEngine::execute) takes the current state and
/// an input, runs the handler registered for that state and returns the
/// next state. The engine itself holds no per-machine state, so one engine
/// can drive any number of machines from any number of threads.
///
/// # Example
///
/// ```rust
/// use statewheel::StateEngine;
///
/// let mut engine = StateEngine::<&str>::new();
/// engine
///     .register_state("asleep", |input| {
///         Ok(Some(if input == "wake up" { "awake" } else { "asleep" }.into()))
///     })
///     .unwrap();
/// engine
///     .register_default("awake", |input| {
///         Ok((input == "go to sleep").then(|| "asleep".into()))
///     })
///     .unwrap();
///
/// let state = engine.execute(None, "go to sleep").unwrap();
/// assert_eq!(state, Some("asleep".into()));
///
/// let state = engine.execute(state, "wake up").unwrap();
/// assert_eq!(state, Some("awake".into()));
///
/// // Returning nothing sends the machine back to the default state.
/// assert_eq!(engine.execute(state, "keep going").unwrap(), None);
/// ```
pub struct StateEngine<I> {
    registry: Registry<I>,
}

impl<I> StateEngine<I> {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    pub fn from_registry(registry: Registry<I>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry<I> {
        &self.registry
    }

    /// Bind one or more states to `handler`, optionally as the default state.
    ///
    /// See [`Registry::register`] for the failure modes.
    pub fn register<S, F>(&mut self, states: S, handler: F, default: bool) -> Result<()>
    where
        S: IntoIterator,
        S::Item: IntoState,
        F: Fn(I) -> HandlerResult + Send + Sync + 'static,
    {
        self.registry.register(states, handler, default)
    }

    /// Bind a single, non-default state.
    pub fn register_state<S, F>(&mut self, state: S, handler: F) -> Result<()>
    where
        S: IntoState,
        F: Fn(I) -> HandlerResult + Send + Sync + 'static,
    {
        self.registry.register([state], handler, false)
    }

    /// Bind the default state, dispatched whenever `execute` gets no state.
    pub fn register_default<S, F>(&mut self, state: S, handler: F) -> Result<()>
    where
        S: IntoState,
        F: Fn(I) -> HandlerResult + Send + Sync + 'static,
    {
        self.registry.register([state], handler, true)
    }

    /// Run the handler for `state` (or the default state for `None`) and
    /// return the validated next state.
    pub fn execute(&self, state: Option<State>, input: I) -> Result<Option<State>> {
        self.dispatch(state.as_ref(), input, None)
    }

    pub(crate) fn dispatch(
        &self,
        state: Option<&State>,
        input: I,
        uid: Option<&Uid>,
    ) -> Result<Option<State>> {
        let (effective, handler) = self.registry.resolve(state)?;
        debug!(state = %effective, "dispatching to handler");

        let outcome = invoke(handler, effective, uid, input);

        let next = outcome.map_err(|source| {
            warn!(state = %effective, error = %source, "handler failed");
            EngineError::HandlerFailed {
                state: effective.clone(),
                source,
            }
        })?;

        match next {
            None => Ok(None),
            Some(next) => match self.registry.canonical(&next) {
                Some(registered) => Ok(Some(registered.clone())),
                None => {
                    warn!(
                        state = %effective,
                        next = %next,
                        "handler returned an unregistered state"
                    );
                    Err(EngineError::NoHandlerAssociation { state: next })
                }
            },
        }
    }
}

/// The context frame lives exactly as long as the handler call.
fn invoke<I>(
    handler: &Handler<I>,
    state: &State,
    uid: Option<&Uid>,
    input: I,
) -> HandlerResult {
    let _guard = ContextGuard::enter(state.clone(), HandlerId::of(handler), uid.cloned());
    (handler)(input)
}

impl<I> Default for StateEngine<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> std::fmt::Debug for StateEngine<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateEngine")
            .field("registry", &self.registry)
            .finish()
    }
}
