//! Builder API for ergonomic engine construction.
//!
//! [`EngineBuilder`] collects registrations fluently and produces either a
//! direct [`StateEngine`](crate::StateEngine) or an identity-scoped
//! [`IntegratedStateEngine`](crate::IntegratedStateEngine). The free
//! functions below build common handlers.

pub mod engine;

pub use engine::EngineBuilder;

use crate::context;
use crate::core::{HandlerResult, State};

/// Handler that always moves to `next`.
///
/// # Example
///
/// ```
/// use statewheel::builder::goto;
/// use statewheel::StateEngine;
///
/// let mut engine = StateEngine::<()>::new();
/// engine.register_default("red", goto("green")).unwrap();
/// engine.register_state("green", goto("red")).unwrap();
///
/// assert_eq!(engine.execute(None, ()).unwrap(), Some("green".into()));
/// ```
pub fn goto<I: 'static>(
    next: impl Into<State>,
) -> impl Fn(I) -> HandlerResult + Send + Sync + Clone + 'static {
    let next = next.into();
    move |_| Ok(Some(next.clone()))
}

/// Handler that stays in whatever state it was dispatched for.
pub fn stay<I: 'static>() -> impl Fn(I) -> HandlerResult + Send + Sync + Clone + 'static
{
    |_| Ok(Some(context::current_state()?))
}

/// Handler that ends the run, sending the machine back to its default state.
pub fn finish<I: 'static>() -> impl Fn(I) -> HandlerResult + Send + Sync + Clone + 'static
{
    |_| Ok(None)
}

/// Handler that looks the input up in a table of `(input, next state)`
/// pairs and stays in the current state for any other input.
///
/// # Example
///
/// ```
/// use statewheel::builder::on_input;
/// use statewheel::StateEngine;
///
/// let mut engine = StateEngine::<&str>::new();
/// engine
///     .register_default("solid", on_input([("melting", "liquid")]))
///     .unwrap();
/// engine
///     .register_state("liquid", on_input([("freezing", "solid"), ("boiling", "gas")]))
///     .unwrap();
/// engine.register_state("gas", on_input([("condensing", "liquid")])).unwrap();
///
/// let state = engine.execute(None, "melting").unwrap();
/// assert_eq!(state, Some("liquid".into()));
/// assert_eq!(engine.execute(state, "stirring").unwrap(), Some("liquid".into()));
/// ```
pub fn on_input<I, T, S>(table: T) -> impl Fn(I) -> HandlerResult + Send + Sync + Clone + 'static
where
    I: PartialEq + Send + Sync + Clone + 'static,
    T: IntoIterator<Item = (I, S)>,
    S: Into<State>,
{
    let table: Vec<(I, State)> = table
        .into_iter()
        .map(|(input, next)| (input, next.into()))
        .collect();
    move |input| match table.iter().find(|(expected, _)| *expected == input) {
        Some((_, next)) => Ok(Some(next.clone())),
        None => Ok(Some(context::current_state()?)),
    }
}
