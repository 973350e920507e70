//! End-to-end scenarios: phase changes of water, identity-scoped machines and
//! concurrent dispatch.

use statewheel::builder::{on_input, EngineBuilder};
use statewheel::{context, EngineError, IntegratedStateEngine, State, StateEngine, Uid};
use std::sync::{Arc, Barrier};

fn ice(input: &str) -> statewheel::HandlerResult {
    Ok(Some(if input == "melting" { "liquid" } else { "solid" }.into()))
}

fn water(input: &str) -> statewheel::HandlerResult {
    Ok(Some(
        match input {
            "freezing" => "solid",
            "boiling" => "gas",
            _ => "liquid",
        }
        .into(),
    ))
}

fn vapour(input: &str) -> statewheel::HandlerResult {
    Ok(Some(if input == "condensing" { "liquid" } else { "gas" }.into()))
}

fn phases() -> StateEngine<&'static str> {
    let mut engine = StateEngine::new();
    engine.register_state("solid", ice).unwrap();
    engine.register_default("liquid", water).unwrap();
    engine.register_state("gas", vapour).unwrap();
    engine
}

#[test]
fn melting_ice_gives_water() {
    let engine = phases();
    assert_eq!(
        engine.execute(Some("solid".into()), "melting").unwrap(),
        Some(State::from("liquid"))
    );
}

#[test]
fn boiling_from_default_gives_gas() {
    let engine = phases();
    assert_eq!(
        engine.execute(None, "boiling").unwrap(),
        Some(State::from("gas"))
    );
}

#[test]
fn melting_from_default_stays_liquid() {
    // the default is already liquid, so there is nothing to melt
    let engine = phases();
    assert_eq!(
        engine.execute(None, "melting").unwrap(),
        Some(State::from("liquid"))
    );
}

#[test]
fn a_full_cycle_returns_to_start() {
    let engine = phases();
    let mut state = Some(State::from("solid"));
    for input in ["melting", "boiling", "condensing", "freezing"] {
        state = engine.execute(state, input).unwrap();
    }
    assert_eq!(state, Some(State::from("solid")));
}

#[test]
fn registration_errors_follow_the_invariants() {
    let mut engine = phases();

    assert!(matches!(
        engine.register_state("gas", vapour),
        Err(EngineError::StateHandlerClash { .. })
    ));
    assert!(matches!(
        engine.register_default("plasma", vapour),
        Err(EngineError::DefaultStateHandlerClash { .. })
    ));
    assert!(matches!(
        engine.register_state(serde_json::json!(["solid"]), ice),
        Err(EngineError::InvalidStateType { .. })
    ));
}

#[test]
fn fresh_identity_starts_at_default_then_continues() {
    let mut engine = IntegratedStateEngine::<&str>::new();
    engine.register_state("solid", ice).unwrap();
    engine.register_default("liquid", water).unwrap();
    engine.register_state("gas", vapour).unwrap();

    assert_eq!(
        engine.execute("u1", "melting").unwrap(),
        Some(State::from("liquid"))
    );
    assert_eq!(
        engine.execute("u1", "freezing").unwrap(),
        Some(State::from("solid"))
    );
    assert_eq!(
        engine.execute("u1", "melting").unwrap(),
        Some(State::from("liquid"))
    );
    assert_eq!(engine.state_of("u1").unwrap(), Some(State::from("liquid")));
}

#[test]
fn json_fed_front_end() {
    let engine = EngineBuilder::<&str>::new()
        .state("solid", on_input([("melting", "liquid")]))
        .and_then(|b| {
            b.default_state("liquid", on_input([("freezing", "solid"), ("boiling", "gas")]))
        })
        .and_then(|b| b.state("gas", on_input([("condensing", "liquid")])))
        .unwrap()
        .build_integrated();

    let uid = serde_json::json!(1001);
    assert_eq!(engine.execute(&uid, "boiling").unwrap(), Some(State::from("gas")));
    assert_eq!(engine.state_of(1001).unwrap(), Some(State::from("gas")));

    assert!(matches!(
        engine.execute(serde_json::json!(null), "boiling"),
        Err(EngineError::InvalidUidType { .. })
    ));
}

#[test]
fn accessor_outside_handler_fails() {
    let engine = phases();
    engine.execute(None, "boiling").unwrap();

    assert!(matches!(
        context::current_state(),
        Err(EngineError::OutsideHandlerContext { .. })
    ));
}

#[test]
fn concurrent_handlers_see_only_their_own_context() {
    let rendezvous = Arc::new(Barrier::new(2));

    let mut engine = IntegratedStateEngine::<()>::new();
    engine
        .register(["left", "right"], move |_| {
            let before = context::current_state()?;
            // both handlers are in flight past this point
            rendezvous.wait();
            let after = context::current_state()?;
            assert_eq!(before, after);
            assert_eq!(context::current_uid()?, Some(Uid::from(after.to_string())));
            Ok(Some(after))
        }, false)
        .unwrap();

    let (left, right) = std::thread::scope(|s| {
        let left = s.spawn(|| engine.execute_from("left", "left", ()));
        let right = s.spawn(|| engine.execute_from("right", "right", ()));
        (left.join().unwrap(), right.join().unwrap())
    });

    assert_eq!(left.unwrap(), Some(State::from("left")));
    assert_eq!(right.unwrap(), Some(State::from("right")));
    assert_eq!(engine.state_of("left").unwrap(), Some(State::from("left")));
    assert_eq!(engine.state_of("right").unwrap(), Some(State::from("right")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_identities_in_parallel() {
    let mut engine = IntegratedStateEngine::<u32>::new();
    engine
        .register_default(0, |step| Ok(Some(step.into())))
        .unwrap();
    engine
        .register([1, 2, 3], |step| {
            let uid = context::current_uid()?.ok_or("missing uid")?;
            assert!(uid.as_str().is_some());
            assert_eq!(context::current_state()?, State::from(step - 1));
            Ok(Some(step.into()))
        }, false)
        .unwrap();
    let engine = Arc::new(engine);

    let mut tasks = Vec::new();
    for machine in 0..32u32 {
        let engine = Arc::clone(&engine);
        tasks.push(tokio::task::spawn_blocking(move || {
            let uid = format!("machine-{machine}");
            let target = machine % 3 + 1;
            for step in 1..=target {
                engine.execute(uid.as_str(), step)?;
            }
            engine.state_of(uid.as_str())
        }));
    }

    for (machine, task) in tasks.into_iter().enumerate() {
        let state = task.await.unwrap().unwrap();
        let expected = machine as i64 % 3 + 1;
        assert_eq!(state, Some(State::from(expected)));
    }
}
