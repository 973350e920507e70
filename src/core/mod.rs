//! Core dispatch types.
//!
//! This module contains the pieces every engine is built from:
//! - Primitive state and identity values, with validated conversions
//! - The state to handler registry
//! - The execution context visible to running handlers

pub mod context;
mod primitive;
mod registry;

pub use context::HandlerContext;
pub use primitive::{IntoState, IntoUid, Primitive, State, Uid};
pub use registry::{Handler, HandlerId, HandlerResult, Registry};
