//! Property-based tests for the transition functions.
//!
//! - Ordering: retrieve is ascending by identity and idempotent
//! - Uniqueness: repeated creates never reuse an identity
//! - Idempotence: PUT, PATCH and DELETE applied twice equal applied once

use std::collections::BTreeSet;

use proptest::prelude::*;
use restful_model::{Entity, EntitySchema, FieldSpec, Fields};
use restful_reducer::{
    ReducerConfig, ReducerError, create, is_sorted_by_identity, merge, remove, replace, retrieve,
};
use serde_json::{Value, json};

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn schema() -> EntitySchema {
    EntitySchema::new(vec![
        FieldSpec::number("id"),
        FieldSpec::text("title"),
        FieldSpec::text("body"),
    ])
}

fn identity_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-50i64..50).prop_map(Value::from),
        (-50i64..50).prop_map(|n| Value::from(n.to_string())),
        Just(Value::Null),
        Just(Value::from("not a number")),
    ]
}

/// Entities with arbitrary (possibly duplicate, missing or non-numeric) identities.
fn loose_state_strategy() -> impl Strategy<Value = Vec<Entity>> {
    prop::collection::vec(
        (prop::option::of(identity_strategy()), "[a-z]{0,6}"),
        0..20,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(id, title)| {
                let mut fields = Fields::new();
                if let Some(id) = id {
                    fields.insert("id".into(), id);
                }
                fields.insert("title".into(), Value::from(title));
                Entity::from_fields(fields)
            })
            .collect()
    })
}

/// Well-formed collections: unique integer identities, sorted.
fn state_strategy() -> impl Strategy<Value = Vec<Entity>> {
    prop::collection::btree_set(1i64..40, 0..12).prop_map(|ids: BTreeSet<i64>| {
        ids.into_iter()
            .map(|id| {
                Entity::from_value(json!({"id": id, "title": format!("t{id}"), "body": format!("b{id}")}))
                    .unwrap()
            })
            .collect()
    })
}

fn body_strategy() -> impl Strategy<Value = Fields> {
    (prop::option::of("[a-z]{0,6}"), prop::option::of(prop::option::of("[a-z]{0,6}"))).prop_map(
        |(title, body)| {
            let mut fields = Fields::new();
            if let Some(title) = title {
                fields.insert("title".into(), Value::from(title));
            }
            if let Some(body) = body {
                fields.insert("body".into(), body.map_or(Value::Null, Value::from));
            }
            fields
        },
    )
}

fn params(id: i64) -> Fields {
    let mut fields = Fields::new();
    fields.insert("id".into(), Value::from(id));
    fields
}

fn identities(state: &[Entity]) -> Vec<f64> {
    state.iter().map(|e| e.identity("id")).collect()
}

// =============================================================================
// ORDERING
// =============================================================================

proptest! {
    #[test]
    fn retrieve_is_sorted(state in loose_state_strategy()) {
        let out = retrieve(&state, &ReducerConfig::default());
        prop_assert!(is_sorted_by_identity(&out, "id"));
        prop_assert_eq!(out.len(), state.len());
    }

    #[test]
    fn retrieve_is_idempotent(state in loose_state_strategy()) {
        let config = ReducerConfig::default();
        let once = retrieve(&state, &config);
        let twice = retrieve(&once, &config);
        prop_assert_eq!(once, twice);
    }
}

// =============================================================================
// CREATE
// =============================================================================

proptest! {
    #[test]
    fn creates_on_empty_yield_one_to_n(n in 1usize..30) {
        let config = ReducerConfig::default();
        let body = Fields::new();
        let mut state: Vec<Entity> = Vec::new();
        for _ in 0..n {
            state = create(&state, &body, &schema(), &config).unwrap();
        }
        let expected: Vec<f64> = (1..=n).map(|i| i as f64).collect();
        prop_assert_eq!(identities(&state), expected);
    }

    #[test]
    fn create_never_reuses_identity(state in state_strategy(), body in body_strategy()) {
        let out = create(&state, &body, &schema(), &ReducerConfig::default()).unwrap();
        let ids: BTreeSet<i64> = out.iter().map(|e| e.identity("id") as i64).collect();
        prop_assert_eq!(ids.len(), out.len());
        prop_assert!(is_sorted_by_identity(&out, "id"));
    }

    #[test]
    fn create_rejects_any_explicit_identity(state in state_strategy(), id in 1i64..100) {
        let err = create(&state, &params(id), &schema(), &ReducerConfig::default()).unwrap_err();
        let is_conflict = matches!(err, ReducerError::IdentityConflict { .. });
        prop_assert!(is_conflict);
    }
}

// =============================================================================
// IDEMPOTENCE
// =============================================================================

proptest! {
    #[test]
    fn remove_is_idempotent(state in loose_state_strategy(), id in -50i64..50) {
        let config = ReducerConfig::default();
        let once = remove(&state, &params(id), &config);
        let twice = remove(&once, &params(id), &config);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn replace_is_idempotent(state in state_strategy(), id in 1i64..45, body in body_strategy()) {
        let config = ReducerConfig::default();
        let once = replace(&state, &params(id), &body, &schema(), &config).unwrap();
        let twice = replace(&once, &params(id), &body, &schema(), &config).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert!(is_sorted_by_identity(&once, "id"));
    }

    #[test]
    fn merge_is_idempotent(state in state_strategy(), id in 1i64..45, body in body_strategy()) {
        let config = ReducerConfig::default();
        let once = merge(&state, &params(id), &body, &schema(), &config).unwrap();
        let twice = merge(&once, &params(id), &body, &schema(), &config).unwrap();
        prop_assert_eq!(&once, &twice);
    }

    #[test]
    fn replace_and_merge_keep_length_when_target_exists(state in state_strategy(), body in body_strategy()) {
        prop_assume!(!state.is_empty());
        let id = state[0].identity("id") as i64;
        let config = ReducerConfig::default();
        let put = replace(&state, &params(id), &body, &schema(), &config).unwrap();
        let patch = merge(&state, &params(id), &body, &schema(), &config).unwrap();
        prop_assert_eq!(put.len(), state.len());
        prop_assert_eq!(patch.len(), state.len());
    }
}
