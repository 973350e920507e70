//! Statewheel: finite state machines with registered state handlers
//!
//! Callers register one handler per state, then drive a machine by handing
//! the engine the current state and an input; the handler for that state
//! decides the next state. Machines can also be driven by identity, with the
//! engine keeping each machine's last state in a pluggable store.
//!
//! # Core Concepts
//!
//! - **State**: a text, integer or float [`Primitive`] naming a node of the machine
//! - **Handler**: a function bound to one or more states, returning the next
//!   state or `None` to go back to the default state
//! - **Default state**: the state dispatched when no state is given
//! - **Context**: the state being handled, readable from inside a handler via
//!   [`context::current_state`]
//! - **Store**: identity to last-state mapping used by [`IntegratedStateEngine`]
//!
//! # Example
//!
//! ```rust
//! use statewheel::{EngineError, StateEngine};
//!
//! let mut engine = StateEngine::<&str>::new();
//! engine
//!     .register_state("solid", |input| {
//!         Ok(Some(if input == "melting" { "liquid" } else { "solid" }.into()))
//!     })
//!     .unwrap();
//! engine
//!     .register_default("liquid", |input| {
//!         Ok(Some(match input {
//!             "freezing" => "solid",
//!             "boiling" => "gas",
//!             _ => "liquid",
//!         }
//!         .into()))
//!     })
//!     .unwrap();
//! engine
//!     .register_state("gas", |input| {
//!         Ok(Some(if input == "condensing" { "liquid" } else { "gas" }.into()))
//!     })
//!     .unwrap();
//!
//! assert_eq!(engine.execute(Some("solid".into()), "melting").unwrap(), Some("liquid".into()));
//! assert_eq!(engine.execute(None, "boiling").unwrap(), Some("gas".into()));
//! assert!(matches!(
//!     engine.execute(Some("plasma".into()), "cooling"),
//!     Err(EngineError::NoHandlerAssociation { .. })
//! ));
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod error;
pub mod snapshot;
pub mod store;

pub use crate::core::context;

// Re-export commonly used types
pub use crate::core::{HandlerId, HandlerResult, IntoState, IntoUid, Primitive, State, Uid};
pub use builder::EngineBuilder;
pub use engine::{IntegratedStateEngine, StateEngine};
pub use error::{EngineError, HandlerError, Result};
pub use snapshot::{StoreSnapshot, SnapshotError};
pub use store::{MemoryStore, StateStore, StoreError};
