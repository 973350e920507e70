//! State to handler registry.

use crate::core::{IntoState, State};
use crate::error::{EngineError, HandlerError, Result};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// What a handler returns: the next state, `None` to fall back to the default
/// state on the next entry, or the handler's own failure.
pub type HandlerResult = std::result::Result<Option<State>, HandlerError>;

/// A registered state handler. Shared between every state it is bound to.
pub type Handler<I> = Arc<dyn Fn(I) -> HandlerResult + Send + Sync>;

/// Identity of a registered handler.
///
/// Every state bound by the same registration call shares one id. Ids are
/// stable for as long as the registry holding the handler is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

impl HandlerId {
    pub(crate) fn of<I>(handler: &Handler<I>) -> Self {
        Self(Arc::as_ptr(handler) as *const () as usize)
    }
}

/// Mapping from states to their handlers, plus the optional default state.
///
/// Registration takes `&mut self`; once registration is done the registry is
/// only read, so it can be shared across threads.
pub struct Registry<I> {
    handlers: HashMap<State, Handler<I>>,
    default_state: Option<State>,
}

impl<I> Registry<I> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            default_state: None,
        }
    }

    /// Bind one or more states to `handler`.
    ///
    /// All states are validated before any is inserted, so a failing call
    /// leaves the registry untouched. With `default`, the first listed state
    /// becomes the default state.
    pub fn register<S, F>(&mut self, states: S, handler: F, default: bool) -> Result<()>
    where
        S: IntoIterator,
        S::Item: IntoState,
        F: Fn(I) -> HandlerResult + Send + Sync + 'static,
    {
        self.register_handler(states, Arc::new(handler), default)
    }

    /// Like [`Registry::register`], for a handler that is already shared.
    pub fn register_handler<S>(
        &mut self,
        states: S,
        handler: Handler<I>,
        default: bool,
    ) -> Result<()>
    where
        S: IntoIterator,
        S::Item: IntoState,
    {
        let states = states
            .into_iter()
            .map(IntoState::into_state)
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::with_capacity(states.len());
        for state in &states {
            if self.handlers.contains_key(state) || !seen.insert(state) {
                return Err(EngineError::StateHandlerClash {
                    state: state.clone(),
                });
            }
        }

        if default && !states.is_empty() {
            if let Some(existing) = &self.default_state {
                return Err(EngineError::DefaultStateHandlerClash {
                    existing: existing.clone(),
                });
            }
            self.default_state = states.first().cloned();
        }

        for state in states {
            self.handlers.insert(state, Arc::clone(&handler));
        }
        Ok(())
    }

    /// Resolve a state, or the default state for `None`, to its handler.
    ///
    /// Returns the registered state value, which may differ in kind from the
    /// one passed in (`1.0` resolves to a registered `1`).
    pub fn resolve(&self, state: Option<&State>) -> Result<(&State, &Handler<I>)> {
        match state {
            None => {
                let default = self
                    .default_state
                    .as_ref()
                    .ok_or(EngineError::NoDefaultState)?;
                self.handlers
                    .get_key_value(default)
                    .ok_or(EngineError::NoDefaultState)
            }
            Some(state) if !state.is_valid() => Err(EngineError::InvalidStateType {
                found: format!("{} {}", state.kind(), state),
            }),
            Some(state) => {
                self.handlers
                    .get_key_value(state)
                    .ok_or_else(|| EngineError::NoHandlerAssociation {
                        state: state.clone(),
                    })
            }
        }
    }

    /// The registered value equal to `state`, if any.
    pub fn canonical(&self, state: &State) -> Option<&State> {
        self.handlers.get_key_value(state).map(|(key, _)| key)
    }

    /// Id of the handler bound to `state`, if any.
    pub fn handler_id(&self, state: &State) -> Option<HandlerId> {
        self.handlers.get(state).map(HandlerId::of)
    }

    pub fn contains(&self, state: &State) -> bool {
        self.handlers.contains_key(state)
    }

    pub fn default_state(&self) -> Option<&State> {
        self.default_state.as_ref()
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.handlers.keys()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<I> Default for Registry<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> fmt::Debug for Registry<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("states", &self.handlers.keys().collect::<Vec<_>>())
            .field("default_state", &self.default_state)
            .finish()
    }
}
