//! Execution context exposed to running state handlers.
//!
//! Every dispatch pushes a frame onto a call-stack-local (per-thread) frame
//! stack before the handler body runs, and pops it when the handler returns,
//! fails or unwinds. Handlers read the frame through [`current_state`],
//! [`current_handler`], [`current_uid`] and [`current`]; outside a handler
//! these fail with
//! [`EngineError::OutsideHandlerContext`].
//!
//! Concurrent dispatches on different threads never see each other's frames,
//! and a handler that calls back into an engine sees the nested frame only
//! until the nested call returns.

use crate::core::{HandlerId, State, Uid};
use crate::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::time::Duration;

thread_local! {
    static FRAMES: RefCell<Vec<HandlerContext>> = const { RefCell::new(Vec::new()) };
}

/// Snapshot of the dispatch a handler is running under.
#[derive(Clone, Debug)]
pub struct HandlerContext {
    /// The state actually dispatched, after default substitution.
    pub state: State,
    /// The handler that was bound to `state`.
    pub handler: HandlerId,
    /// The machine identity, when dispatched through an identity-scoped engine.
    pub uid: Option<Uid>,
    pub started_at: DateTime<Utc>,
}

impl HandlerContext {
    /// Time spent in the handler so far.
    pub fn elapsed(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Keeps a context frame alive for the duration of one handler invocation.
///
/// Not `Send`: the frame lives on the stack of the thread that pushed it.
pub(crate) struct ContextGuard {
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl ContextGuard {
    pub(crate) fn enter(state: State, handler: HandlerId, uid: Option<Uid>) -> Self {
        let frame = HandlerContext {
            state,
            handler,
            uid,
            started_at: Utc::now(),
        };
        let depth = FRAMES.with(|frames| {
            let mut frames = frames.borrow_mut();
            frames.push(frame);
            frames.len()
        });
        Self {
            depth,
            _not_send: PhantomData,
        }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let _ = FRAMES.try_with(|frames| {
            frames.borrow_mut().truncate(self.depth - 1);
        });
    }
}

fn with_top<T>(accessor: &'static str, f: impl FnOnce(&HandlerContext) -> T) -> Result<T> {
    FRAMES
        .with(|frames| frames.borrow().last().map(f))
        .ok_or(EngineError::OutsideHandlerContext { accessor })
}

/// The state being handled by the innermost in-flight handler on this call stack.
///
/// # Example
///
/// ```rust
/// use statewheel::context;
/// use statewheel::{EngineError, StateEngine};
///
/// let mut engine = StateEngine::<()>::new();
/// engine
///     .register_default("idle", |_| Ok(Some(context::current_state()?)))
///     .unwrap();
///
/// // The default handler sees the default state, not an empty one.
/// assert_eq!(engine.execute(None, ()).unwrap(), Some("idle".into()));
///
/// assert!(matches!(
///     context::current_state(),
///     Err(EngineError::OutsideHandlerContext { .. })
/// ));
/// ```
pub fn current_state() -> Result<State> {
    with_top("current_state", |frame| frame.state.clone())
}

/// The handler running on this call stack, comparable against
/// [`Registry::handler_id`](crate::core::Registry::handler_id).
pub fn current_handler() -> Result<HandlerId> {
    with_top("current_handler", |frame| frame.handler)
}

/// The identity of the machine being driven, `None` for direct dispatch.
pub fn current_uid() -> Result<Option<Uid>> {
    with_top("current_uid", |frame| frame.uid.clone())
}

/// The full context of the innermost in-flight handler.
pub fn current() -> Result<HandlerContext> {
    with_top("current", HandlerContext::clone)
}

/// Whether a handler is executing on this call stack.
pub fn in_handler() -> bool {
    FRAMES.with(|frames| !frames.borrow().is_empty())
}
