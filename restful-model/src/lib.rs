//! Entity model for restful-state.
//!
//! Defines the types the reducer and the selection combinators share:
//! - [`Entity`]: an immutable, ordered field mapping
//! - [`EntitySchema`]: declared fields, coercions, defaults and the unknown-field policy
//! - [`EntitySanitizer`]: the canonicalization contract the reducer depends on
//! - [`SchemaError`]: field-level diagnostics for rejected input
//!
//! `null` and "absent" are different things throughout: a field mapped to
//! `Value::Null` was explicitly cleared, a missing key was never given.

mod entity;
mod error;
mod handler;
mod schema;

pub use entity::{Entity, Fields, coerce_number, number_value};
pub use error::{FieldError, SchemaError};
pub use handler::{EntitySanitizer, SanitizeOptions};
pub use schema::{EntitySchema, FieldSpec, FieldType, UnknownFieldPolicy};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, SchemaError>;
