use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::{Entity, Fields, number_value};
use crate::error::{FieldError, SchemaError};
use crate::handler::{EntitySanitizer, SanitizeOptions};

/// Describes the fields an entity type carries and how raw input is
/// canonicalized into them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,
}

impl EntitySchema {
    #[must_use]
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self {
            fields,
            unknown_fields: UnknownFieldPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Looks up the declaration for `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A single declared field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    /// Value used when the field is missing from the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Rejects entities where the field ends up absent or null.
    #[serde(default)]
    pub required: bool,
}

impl FieldSpec {
    fn simple(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            default: None,
            required: false,
        }
    }

    /// Shorthand for a numeric field.
    pub fn number(name: &str) -> Self {
        Self::simple(name, FieldType::Number)
    }

    /// Shorthand for a text field.
    pub fn text(name: &str) -> Self {
        Self::simple(name, FieldType::Text)
    }

    /// Shorthand for a boolean field.
    pub fn bool(name: &str) -> Self {
        Self::simple(name, FieldType::Bool)
    }

    /// Shorthand for a JSON array field.
    pub fn array(name: &str) -> Self {
        Self::simple(name, FieldType::Array)
    }

    /// Shorthand for a nested JSON object field.
    pub fn object(name: &str) -> Self {
        Self::simple(name, FieldType::Object)
    }

    /// Shorthand for an untyped field.
    pub fn any(name: &str) -> Self {
        Self::simple(name, FieldType::Any)
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// The value type a field is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Number,
    Text,
    Bool,
    Array,
    Object,
    Any,
}

impl FieldType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Text => "text",
            Self::Bool => "bool",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
        }
    }

    /// Coerces `value` to this type. `null` is accepted by every type.
    pub fn coerce(self, value: Value) -> Result<Value, String> {
        if value.is_null() {
            return Ok(value);
        }
        match (self, value) {
            (Self::Any, v) => Ok(v),
            (Self::Number, v @ Value::Number(_)) => Ok(v),
            (Self::Number, Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(number_value(n)),
                _ => Err(format!("cannot convert {s:?} to a number")),
            },
            (Self::Text, v @ Value::String(_)) => Ok(v),
            (Self::Text, Value::Number(n)) => Ok(Value::String(n.to_string())),
            (Self::Text, Value::Bool(b)) => Ok(Value::String(b.to_string())),
            (Self::Bool, v @ Value::Bool(_)) => Ok(v),
            (Self::Bool, Value::String(s)) => match s.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(format!("cannot convert {s:?} to a bool")),
            },
            (Self::Bool, Value::Number(n)) => match n.as_f64() {
                Some(x) if x == 0.0 => Ok(Value::Bool(false)),
                Some(x) if x == 1.0 => Ok(Value::Bool(true)),
                _ => Err(format!("cannot convert {n} to a bool")),
            },
            (Self::Array, v @ Value::Array(_)) => Ok(v),
            (Self::Object, v @ Value::Object(_)) => Ok(v),
            (ty, other) => Err(format!("expected {}, got {}", ty.as_str(), kind_of(&other))),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// What happens to input fields the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Undeclared fields are silently removed.
    #[default]
    Drop,
    /// Each undeclared field is reported as a validation error.
    Reject,
}

impl EntitySanitizer for EntitySchema {
    fn sanitize(&self, mut raw: Fields, options: SanitizeOptions) -> crate::Result<Entity> {
        let mut errors = Vec::new();
        let mut out = Fields::new();

        for spec in &self.fields {
            let value = match raw.remove(&spec.name) {
                Some(v) => Some(v),
                None => spec
                    .default
                    .clone()
                    .or_else(|| options.fill_missing_with_null.then_some(Value::Null)),
            };

            let Some(value) = value else {
                if spec.required {
                    errors.push(FieldError::new(&spec.name, "is required"));
                }
                continue;
            };

            match spec.field_type.coerce(value) {
                Ok(Value::Null) if spec.required => {
                    errors.push(FieldError::new(&spec.name, "is required"));
                }
                Ok(v) => {
                    out.insert(spec.name.clone(), v);
                }
                Err(message) => errors.push(FieldError::new(&spec.name, message)),
            }
        }

        if self.unknown_fields == UnknownFieldPolicy::Reject {
            errors.extend(raw.keys().map(|k| FieldError::new(k, "is not declared by the schema")));
        }

        if errors.is_empty() {
            Ok(Entity::from_fields(out))
        } else {
            Err(SchemaError::new(errors))
        }
    }
}
