//! Entity selection for PUT, PATCH and DELETE requests.

use std::fmt;
use std::sync::Arc;

use restful_model::{Entity, Fields};

use crate::identity::IdentityKey;

/// Signature of a caller-supplied selection rule.
pub type PredicateFn = dyn Fn(&Entity, &Fields, &str) -> bool + Send + Sync;

/// Decides which entities a request's route params select.
#[derive(Clone, Default)]
pub enum Predicate {
    /// `entity[key]` and `params[key]` are equal as numbers.
    #[default]
    Identity,
    /// Fully replaces the identity rule.
    Custom(Arc<PredicateFn>),
}

impl Predicate {
    #[must_use]
    pub fn identity() -> Self {
        Self::Identity
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Entity, &Fields, &str) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    #[must_use]
    pub fn matches(&self, entity: &Entity, params: &Fields, identity_key: &str) -> bool {
        match self {
            Self::Identity => identity_matches(entity, params, identity_key),
            Self::Custom(f) => f(entity, params, identity_key),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("Predicate::Identity"),
            Self::Custom(_) => f.write_str("Predicate::Custom(..)"),
        }
    }
}

/// The default rule. A side that does not coerce to a number (absent key,
/// unparseable string) never matches. Integers compare exactly.
#[must_use]
pub fn identity_matches(entity: &Entity, params: &Fields, identity_key: &str) -> bool {
    IdentityKey::of_entity(entity, identity_key).same(IdentityKey::of(params.get(identity_key)))
}

/// True if `predicate` selects `entity` for a request carrying `params`.
#[must_use]
pub fn matches(entity: &Entity, params: &Fields, identity_key: &str, predicate: &Predicate) -> bool {
    predicate.matches(entity, params, identity_key)
}
