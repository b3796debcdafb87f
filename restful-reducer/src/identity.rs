//! Identity generation and ordering.
//!
//! Collections are ordered ascending by the numeric value of the identity
//! key. The order is rebuilt from scratch after every mutation rather than
//! maintained incrementally.
//!
//! Integral identities are handled in the integer domain so values past
//! 2^53 stay distinct; only fractional identities go through `f64`.

use std::cmp::Ordering;

use restful_model::{Entity, coerce_number, number_value};
use serde_json::Value;

use crate::error::{ReducerError, Result};

/// Largest integer `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Numeric view of an identity value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IdentityKey {
    /// Exact integral identity, covering the whole `i64` and `u64` ranges.
    Integer(i128),
    /// Finite fractional identity.
    Float(f64),
    /// Absent or not a number. Never equal to anything, sorts last.
    Missing,
}

impl IdentityKey {
    /// Coerces a raw field value the same way [`coerce_number`] does, but
    /// keeps integers exact.
    #[must_use]
    pub fn of(value: Option<&Value>) -> Self {
        let exact = match value {
            Some(Value::Number(n)) => n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from)),
            Some(Value::String(s)) => s.trim().parse::<i128>().ok(),
            _ => None,
        };
        if let Some(n) = exact {
            return Self::Integer(n);
        }

        let n = coerce_number(value);
        if !n.is_finite() {
            Self::Missing
        } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
            Self::Integer(n as i128)
        } else {
            Self::Float(n)
        }
    }

    /// The identity of `entity` under `identity_key`.
    #[must_use]
    pub fn of_entity(entity: &Entity, identity_key: &str) -> Self {
        Self::of(entity.get(identity_key))
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Integer(n) => n as f64,
            Self::Float(f) => f,
            Self::Missing => f64::NAN,
        }
    }

    /// True if both sides are present and numerically equal.
    #[must_use]
    pub fn same(self, other: Self) -> bool {
        match (self, other) {
            (Self::Missing, _) | (_, Self::Missing) => false,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }

    /// Total order: numbers ascending, missing identities last and equal to
    /// each other.
    #[must_use]
    pub fn compare(self, other: Self) -> Ordering {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(&b),
            (a, b) => compare_identities(a.as_f64(), b.as_f64()),
        }
    }
}

/// Returns the identity for the next created entity: the largest identity
/// present plus one, or `1` when no entity has a numeric identity.
///
/// Integral identities are incremented exactly. Fails with
/// [`ReducerError::IdentityExhausted`] when the result would not fit a JSON
/// integer (`u64::MAX` is the ceiling).
pub fn next_identity(state: &[Entity], identity_key: &str) -> Result<Value> {
    let mut max_integer: Option<i128> = None;
    let mut max_float: Option<f64> = None;
    for entity in state {
        match IdentityKey::of_entity(entity, identity_key) {
            IdentityKey::Integer(n) => max_integer = Some(max_integer.map_or(n, |m| m.max(n))),
            IdentityKey::Float(f) => max_float = Some(max_float.map_or(f, |m| m.max(f))),
            IdentityKey::Missing => {}
        }
    }

    match (max_integer, max_float) {
        (None, None) => Ok(Value::from(1)),
        (None, Some(f)) => Ok(number_value(f + 1.0)),
        (Some(n), Some(f)) if f > n as f64 => Ok(number_value(f + 1.0)),
        (Some(n), _) => n
            .checked_add(1)
            .and_then(|next| {
                i64::try_from(next)
                    .map(Value::from)
                    .or_else(|_| u64::try_from(next).map(Value::from))
                    .ok()
            })
            .ok_or_else(|| ReducerError::IdentityExhausted {
                key: identity_key.to_string(),
            }),
    }
}

/// Total order over coerced identities. NaN sorts after every number and
/// compares equal to other NaN so a stable sort keeps their relative order.
#[must_use]
pub fn compare_identities(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

/// Stable ascending sort by numeric identity.
#[must_use]
pub fn sort_by_identity(state: &[Entity], identity_key: &str) -> Vec<Entity> {
    let mut sorted = state.to_vec();
    sort_in_place(&mut sorted, identity_key);
    sorted
}

pub(crate) fn sort_in_place(state: &mut [Entity], identity_key: &str) {
    state.sort_by_cached_key(|e| OrderedIdentity(IdentityKey::of_entity(e, identity_key)));
}

/// True if `state` is ascending by numeric identity.
#[must_use]
pub fn is_sorted_by_identity(state: &[Entity], identity_key: &str) -> bool {
    state.windows(2).all(|pair| {
        IdentityKey::of_entity(&pair[0], identity_key)
            .compare(IdentityKey::of_entity(&pair[1], identity_key))
            != Ordering::Greater
    })
}

/// `Ord` adapter so identities can key a cached sort.
struct OrderedIdentity(IdentityKey);

impl PartialEq for OrderedIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderedIdentity {}

impl PartialOrd for OrderedIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.compare(other.0)
    }
}
