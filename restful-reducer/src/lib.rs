//! REST-style state transitions over ordered entity collections.
//!
//! Given the current collection and a verb-tagged request, each transition
//! computes the next collection:
//! - [`retrieve`] (GET): reorder by identity
//! - [`create`] (POST): insert with a generated identity
//! - [`replace`] (PUT): full replacement; unsent fields become null
//! - [`merge`] (PATCH): partial update; unsent fields are kept
//! - [`remove`] (DELETE): drop every selected entity
//!
//! Collections are never mutated in place. After every transition the
//! identities are unique and the collection is sorted ascending by the
//! numeric value of the identity key. Entities are built only through an
//! [`EntitySanitizer`](restful_model::EntitySanitizer).
//!
//! [`RestfulResource`] binds a schema and a [`ReducerConfig`] once and
//! dispatches [`Request`]s by [`Verb`].

mod config;
mod dispatch;
mod error;
mod identity;
mod predicate;
mod transitions;

pub use config::{DEFAULT_IDENTITY_KEY, ReducerConfig, ReducerSettings};
pub use dispatch::{ActionNames, Request, RestfulResource, Verb};
pub use error::{ReducerError, Result};
pub use identity::{
    IdentityKey, compare_identities, is_sorted_by_identity, next_identity, sort_by_identity,
};
pub use predicate::{Predicate, PredicateFn, identity_matches, matches};
pub use transitions::{create, merge, remove, replace, retrieve};
