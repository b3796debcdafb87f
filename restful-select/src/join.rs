use std::fmt;
use std::sync::Arc;

use restful_model::{Entity, Fields};
use serde_json::Value;
use tracing::trace;

/// Signature of a caller-supplied join rule: `(left, left_key, right, right_key)`.
pub type JoinPredicateFn = dyn Fn(&Entity, &str, &Entity, &str) -> bool + Send + Sync;

/// Decides whether a row of the right collection joins a row of the left.
#[derive(Clone, Default)]
pub enum JoinPredicate {
    /// `left[left_key]` and `right[right_key]` are equal as numbers.
    #[default]
    Identity,
    Custom(Arc<JoinPredicateFn>),
}

impl JoinPredicate {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Entity, &str, &Entity, &str) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    #[must_use]
    pub fn matches(&self, left: &Entity, left_key: &str, right: &Entity, right_key: &str) -> bool {
        match self {
            Self::Identity => identity_join(left, left_key, right, right_key),
            Self::Custom(f) => f(left, left_key, right, right_key),
        }
    }
}

impl fmt::Debug for JoinPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("JoinPredicate::Identity"),
            Self::Custom(_) => f.write_str("JoinPredicate::Custom(..)"),
        }
    }
}

/// Numeric equality of the two join fields. Missing fields never join.
#[must_use]
pub fn identity_join(left: &Entity, left_key: &str, right: &Entity, right_key: &str) -> bool {
    left.number(left_key) == right.number(right_key)
}

/// Left join: each row of `left` is copied with `dest_key` holding the last
/// matching row of `right` as a JSON object. When nothing matches,
/// `dest_key` is removed from the copy.
#[must_use]
pub fn extend_rows(
    left: &[Entity],
    left_key: &str,
    right: &[Entity],
    right_key: &str,
    dest_key: &str,
    predicate: &JoinPredicate,
) -> Vec<Entity> {
    let extended: Vec<Entity> = left
        .iter()
        .map(|row| {
            let joined = right
                .iter()
                .rev()
                .find(|other| predicate.matches(row, left_key, other, right_key));
            let mut fields: Fields = row.fields().clone();
            match joined {
                Some(other) => {
                    fields.insert(dest_key.to_string(), Value::from(other.clone()));
                }
                None => {
                    fields.shift_remove(dest_key);
                }
            }
            Entity::from_fields(fields)
        })
        .collect();
    trace!(rows = extended.len(), dest_key, "Extended rows");
    extended
}
