//! Engines that drive state machines.
//!
//! - [`StateEngine`] dispatches an explicit state: the caller keeps the
//!   state between calls.
//! - [`IntegratedStateEngine`] dispatches by identity: the engine keeps each
//!   machine's state in a [`StateStore`](crate::store::StateStore).
//!
//! Both are read-only once registration is done and can be shared across
//! threads behind a reference or an `Arc`.

mod dispatch;
mod integrated;

pub use dispatch::StateEngine;
pub use integrated::IntegratedStateEngine;
