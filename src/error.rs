//! Engine error taxonomy.
//!
//! Every failure the engine can report surfaces synchronously to the caller
//! of `register` or `execute`. Nothing is retried internally.

use crate::core::State;
use crate::store::StoreError;
use thiserror::Error;

/// Error produced by a state handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used across the crate.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// Errors raised while registering handlers or driving a machine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("a state can only be text, an integer or a float, found {found}")]
    InvalidStateType { found: String },

    #[error("state '{state}' is already linked to a handler")]
    StateHandlerClash { state: State },

    #[error("an entry point handler is already registered for default state '{existing}'")]
    DefaultStateHandlerClash { existing: State },

    #[error(
        "state '{state}' does not have a handler associated with it. \
         Handlers must only return states that are registered"
    )]
    NoHandlerAssociation { state: State },

    #[error(
        "no handler is registered for the machine's entry point. \
         Register one with default = true to handle empty states"
    )]
    NoDefaultState,

    #[error("a uid can only be text, an integer or a float, found {found}")]
    InvalidUidType { found: String },

    #[error("'{accessor}' is only available while a state handler is executing")]
    OutsideHandlerContext { accessor: &'static str },

    #[error("handler for state '{state}' failed")]
    HandlerFailed {
        state: State,
        #[source]
        source: HandlerError,
    },

    #[error("state store operation failed")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// True when a registration collided with an existing binding or default.
    ///
    /// `InvalidStateType` is not a clash: registration and dispatch both raise it.
    pub fn is_clash(&self) -> bool {
        matches!(
            self,
            Self::StateHandlerClash { .. } | Self::DefaultStateHandlerClash { .. }
        )
    }
}
