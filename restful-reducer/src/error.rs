use restful_model::SchemaError;
use serde_json::Value;

/// Result type for reducer operations.
pub type Result<T> = std::result::Result<T, ReducerError>;

/// Errors a transition can fail with. A failed transition applies nothing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReducerError {
    /// A create request picked its own identity, or an insertion would
    /// reuse an identity already held by another entity.
    #[error("identity conflict on `{key}`: {value}")]
    IdentityConflict { key: String, value: Value },

    /// The next generated identity would not fit a JSON integer.
    #[error("identities on `{key}` are exhausted")]
    IdentityExhausted { key: String },

    #[error("params must provide `{key}` when updating an entity")]
    MissingIdentity { key: String },

    #[error(transparent)]
    SchemaValidation(#[from] SchemaError),

    #[error("unknown verb: {0:?}")]
    UnknownVerb(String),

    #[error("no verb bound to action {0:?}")]
    UnknownAction(String),
}
