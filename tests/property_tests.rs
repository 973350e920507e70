//! Property-based tests for registration, dispatch and storage.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use statewheel::store::{MemoryStore, StateStore};
use statewheel::{context, EngineError, HandlerResult, Primitive, StateEngine};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

prop_compose! {
    fn arbitrary_float()(f in -1.0e12f64..1.0e12f64) -> Primitive {
        Primitive::Float(f)
    }
}

fn arbitrary_primitive() -> impl Strategy<Value = Primitive> {
    prop_oneof![
        "[a-z]{1,12}".prop_map(Primitive::Text),
        any::<i64>().prop_map(Primitive::Integer),
        arbitrary_float(),
    ]
}

/// Floats with short exact decimal forms, safe to push through JSON text.
fn json_safe_primitive() -> impl Strategy<Value = Primitive> {
    prop_oneof![
        "[a-z]{1,12}".prop_map(Primitive::Text),
        any::<i64>().prop_map(Primitive::Integer),
        (-4000i32..4000).prop_map(|n| Primitive::Float(f64::from(n) / 8.0)),
    ]
}

fn hash_of(p: &Primitive) -> u64 {
    let mut hasher = DefaultHasher::new();
    p.hash(&mut hasher);
    hasher.finish()
}

fn noop(_: ()) -> HandlerResult {
    Ok(None)
}

fn phases() -> StateEngine<()> {
    let mut engine = StateEngine::new();
    engine.register(["solid", "gas"], noop, false).unwrap();
    engine.register_default("liquid", noop).unwrap();
    engine
}

proptest! {
    #[test]
    fn registering_twice_clashes(state in arbitrary_primitive()) {
        let mut engine = StateEngine::<()>::new();
        engine.register_state(state.clone(), noop).unwrap();

        let err = engine.register_state(state, noop).unwrap_err();
        prop_assert!(
            matches!(err, EngineError::StateHandlerClash { .. }),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn second_default_clashes(first in arbitrary_primitive(), second in arbitrary_primitive()) {
        prop_assume!(first != second);
        let mut engine = StateEngine::<()>::new();
        engine.register_default(first, noop).unwrap();

        let err = engine.register_default(second, noop).unwrap_err();
        prop_assert!(
            matches!(err, EngineError::DefaultStateHandlerClash { .. }),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn unregistered_states_have_no_handler(state in arbitrary_primitive()) {
        let engine = phases();
        prop_assume!(!engine.registry().contains(&state));

        let err = engine.execute(Some(state), ()).unwrap_err();
        prop_assert!(
            matches!(err, EngineError::NoHandlerAssociation { .. }),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn self_loop_is_idempotent(state in arbitrary_primitive(), rounds in 1..8usize) {
        let mut engine = StateEngine::<()>::new();
        engine
            .register_state(state.clone(), |_| Ok(Some(context::current_state()?)))
            .unwrap();

        let mut current = Some(state.clone());
        for _ in 0..rounds {
            current = engine.execute(current, ()).unwrap();
            prop_assert_eq!(current.as_ref(), Some(&state));
        }
    }

    #[test]
    fn context_matches_dispatched_state(state in arbitrary_primitive()) {
        let mut engine = StateEngine::<()>::new();
        engine
            .register_state(state.clone(), |_| Ok(Some(context::current_state()?)))
            .unwrap();

        let seen = engine.execute(Some(state.clone()), ()).unwrap();
        prop_assert_eq!(seen, Some(state));
        prop_assert!(!context::in_handler());
    }

    #[test]
    fn store_round_trip(uid in arbitrary_primitive(), state in arbitrary_primitive()) {
        let store = MemoryStore::new();
        store.set(&uid, Some(state.clone())).unwrap();
        prop_assert_eq!(store.get(&uid).unwrap(), Some(state));
    }

    #[test]
    fn store_keeps_identities_apart(
        a in arbitrary_primitive(),
        b in arbitrary_primitive(),
        sa in arbitrary_primitive(),
        sb in arbitrary_primitive(),
    ) {
        prop_assume!(a != b);
        let store = MemoryStore::new();
        store.set(&a, Some(sa.clone())).unwrap();
        store.set(&b, Some(sb.clone())).unwrap();

        prop_assert_eq!(store.get(&a).unwrap(), Some(sa));
        prop_assert_eq!(store.get(&b).unwrap(), Some(sb));
    }

    #[test]
    fn integral_floats_hash_like_integers(i in -(1i64 << 52)..(1i64 << 52)) {
        let int = Primitive::Integer(i);
        let float = Primitive::Float(i as f64);
        prop_assert_eq!(&int, &float);
        prop_assert_eq!(hash_of(&int), hash_of(&float));
    }

    #[test]
    fn equal_values_hash_alike(a in arbitrary_primitive(), b in arbitrary_primitive()) {
        if a == b {
            prop_assert_eq!(hash_of(&a), hash_of(&b));
        }
    }

    #[test]
    fn primitive_roundtrip_serialization(value in json_safe_primitive()) {
        let json = serde_json::to_string(&value).unwrap();
        let deserialized: Primitive = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(value, deserialized);
    }
}
