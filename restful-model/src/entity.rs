use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered field mapping.
///
/// A key mapped to `Value::Null` is intentionally null; a key that is not
/// present is absent. Replace semantics depend on telling the two apart.
pub type Fields = serde_json::Map<String, Value>;

/// A canonicalized record held in a collection.
///
/// Entities are produced by an [`EntitySanitizer`](crate::EntitySanitizer)
/// and never patched in place: a changed entity is a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity {
    fields: Fields,
}

impl Entity {
    /// Wraps already-canonical fields. Transition code should go through a
    /// sanitizer instead; this is for fixtures and deserialized state.
    #[must_use]
    pub fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    /// Builds an entity from a JSON object. Non-object values yield `None`.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    #[must_use]
    pub fn into_fields(self) -> Fields {
        self.fields
    }

    /// Returns the raw value of `field`, or `None` when the field is absent.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// True if `field` is present, including when it holds null.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Extract a string value.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Extract a boolean value.
    #[must_use]
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(Value::as_bool)
    }

    /// Numeric view of `field` using [`coerce_number`]; NaN when absent.
    #[must_use]
    pub fn number(&self, field: &str) -> f64 {
        coerce_number(self.fields.get(field))
    }

    /// The identity value under `identity_key`, coerced to a number.
    #[must_use]
    pub fn identity(&self, identity_key: &str) -> f64 {
        self.number(identity_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Entity> for Value {
    fn from(entity: Entity) -> Self {
        Value::Object(entity.fields)
    }
}

/// Loose numeric coercion used for identity comparison and ordering.
///
/// - numbers map to themselves
/// - strings are trimmed and parsed; a blank string is `0`
/// - `true`/`false` map to `1`/`0`, `null` maps to `0`
/// - absent fields, arrays and objects are NaN
#[must_use]
pub fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Array(_) | Value::Object(_)) => f64::NAN,
    }
}

/// Converts a number into the JSON value stored for it: integral values in
/// `i64` range become JSON integers, other finite values JSON floats, and
/// non-finite values `null`.
#[must_use]
pub fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}
