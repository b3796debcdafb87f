//! Verb-level transition functions.
//!
//! Each function borrows the current collection and returns the next one.
//! On error nothing is applied and the caller keeps the collection it had.

use restful_model::{Entity, EntitySanitizer, Fields, SanitizeOptions};
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::ReducerConfig;
use crate::error::{ReducerError, Result};
use crate::identity::{IdentityKey, next_identity, sort_by_identity, sort_in_place};

/// Retrieve entities. Typically handles GET.
///
/// Returns the collection ordered by identity; never fails.
#[must_use]
pub fn retrieve(state: &[Entity], config: &ReducerConfig) -> Vec<Entity> {
    trace!(count = state.len(), "Retrieving entities");
    sort_by_identity(state, config.identity_key())
}

/// Create an entity with a generated identity. Typically handles POST.
///
/// The body must not carry its own identity. Not idempotent: every call
/// produces a new entity.
pub fn create<S>(
    state: &[Entity],
    body: &Fields,
    schema: &S,
    config: &ReducerConfig,
) -> Result<Vec<Entity>>
where
    S: EntitySanitizer + ?Sized,
{
    let key = config.identity_key();
    if let Some(value) = body.get(key).filter(|v| !v.is_null()) {
        return Err(ReducerError::IdentityConflict {
            key: key.to_string(),
            value: value.clone(),
        });
    }

    let identity = next_identity(state, key)?;
    let mut raw = body.clone();
    raw.insert(key.to_string(), identity.clone());
    let entity = schema.sanitize(raw, SanitizeOptions::default())?;

    debug!(identity_key = key, identity = %identity, "Created entity");
    insert(state.to_vec(), entity, key)
}

/// Replace an entity, or create it at the route identity. Typically handles PUT.
///
/// Fields of the existing entity that the body does not resend are set to
/// null, and any declared field still unset is nulled by the sanitizer. The
/// create path nulls unset fields too, so applying the same request twice
/// yields the same entity.
///
/// The route identity always wins over an identity in the body, on both the
/// create and the replace path.
pub fn replace<S>(
    state: &[Entity],
    params: &Fields,
    body: &Fields,
    schema: &S,
    config: &ReducerConfig,
) -> Result<Vec<Entity>>
where
    S: EntitySanitizer + ?Sized,
{
    let key = config.identity_key();
    let route_identity = require_identity(params, key)?;
    let (selected, rest) = select(state, params, config);

    // Last selected entity is the base when a custom predicate matches several.
    let Some(existing) = selected.last() else {
        let mut raw = body.clone();
        raw.insert(key.to_string(), route_identity.clone());
        let entity = schema.sanitize(raw, SanitizeOptions::fill_missing_with_null())?;

        debug!(identity_key = key, identity = %route_identity, "Created entity at route identity");
        return insert(rest, entity, key);
    };

    let mut raw = existing.fields().clone();
    for (field, value) in &mut raw {
        if field != key && !body.contains_key(field) {
            *value = Value::Null;
        }
    }
    raw.extend(body.iter().map(|(k, v)| (k.clone(), v.clone())));
    raw.insert(key.to_string(), route_identity.clone());
    let entity = schema.sanitize(raw, SanitizeOptions::fill_missing_with_null())?;

    debug!(
        identity_key = key,
        identity = %route_identity,
        replaced = selected.len(),
        "Replaced entity"
    );
    insert(rest, entity, key)
}

/// Update the given fields of an existing entity. Typically handles PATCH.
///
/// Never creates: when nothing is selected the collection is returned
/// unchanged. Fields the body leaves out keep their values.
pub fn merge<S>(
    state: &[Entity],
    params: &Fields,
    body: &Fields,
    schema: &S,
    config: &ReducerConfig,
) -> Result<Vec<Entity>>
where
    S: EntitySanitizer + ?Sized,
{
    let key = config.identity_key();
    let route_identity = require_identity(params, key)?;
    let (selected, rest) = select(state, params, config);

    let Some(existing) = selected.last() else {
        debug!(identity_key = key, identity = %route_identity, "No entity to merge into");
        return Ok(state.to_vec());
    };

    let mut raw = existing.fields().clone();
    raw.extend(body.iter().map(|(k, v)| (k.clone(), v.clone())));
    let entity = schema.sanitize(raw, SanitizeOptions::default())?;

    debug!(identity_key = key, identity = %route_identity, "Merged entity");
    insert(rest, entity, key)
}

/// Remove every selected entity. Typically handles DELETE.
///
/// Survivors keep their relative order. Removing nothing is not an error.
#[must_use]
pub fn remove(state: &[Entity], params: &Fields, config: &ReducerConfig) -> Vec<Entity> {
    let key = config.identity_key();
    let remaining: Vec<Entity> = state
        .iter()
        .filter(|e| !config.predicate.matches(e, params, key))
        .cloned()
        .collect();

    debug!(
        identity_key = key,
        removed = state.len() - remaining.len(),
        "Removed entities"
    );
    remaining
}

fn require_identity<'a>(params: &'a Fields, key: &str) -> Result<&'a Value> {
    params
        .get(key)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ReducerError::MissingIdentity {
            key: key.to_string(),
        })
}

/// Splits `state` into the entities the request selects and owned copies of
/// the rest.
fn select<'a>(
    state: &'a [Entity],
    params: &Fields,
    config: &ReducerConfig,
) -> (Vec<&'a Entity>, Vec<Entity>) {
    let key = config.identity_key();
    let mut selected = Vec::new();
    let mut rest = Vec::with_capacity(state.len());
    for entity in state {
        if config.predicate.matches(entity, params, key) {
            selected.push(entity);
        } else {
            rest.push(entity.clone());
        }
    }
    (selected, rest)
}

/// Adds `entity` to `rest` and re-sorts, refusing to reuse an identity.
fn insert(mut rest: Vec<Entity>, entity: Entity, key: &str) -> Result<Vec<Entity>> {
    let identity = IdentityKey::of_entity(&entity, key);
    if rest.iter().any(|e| IdentityKey::of_entity(e, key).same(identity)) {
        return Err(ReducerError::IdentityConflict {
            key: key.to_string(),
            value: entity.get(key).cloned().unwrap_or(Value::Null),
        });
    }
    rest.push(entity);
    sort_in_place(&mut rest, key);
    Ok(rest)
}
