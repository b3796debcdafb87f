use serde::{Deserialize, Serialize};

use crate::predicate::Predicate;

/// Identity key used when none is configured.
pub const DEFAULT_IDENTITY_KEY: &str = "id";

/// Fixed parameters every transition runs with.
#[derive(Debug, Clone)]
pub struct ReducerConfig {
    /// Field holding each entity's unique identity.
    pub identity_key: String,
    /// Rule selecting the entities a PUT, PATCH or DELETE targets.
    pub predicate: Predicate,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            identity_key: DEFAULT_IDENTITY_KEY.to_string(),
            predicate: Predicate::Identity,
        }
    }
}

impl ReducerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_identity_key(mut self, identity_key: impl Into<String>) -> Self {
        self.identity_key = identity_key.into();
        self
    }

    #[must_use]
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = predicate;
        self
    }

    #[must_use]
    pub fn identity_key(&self) -> &str {
        &self.identity_key
    }
}

/// Serializable subset of [`ReducerConfig`], for loading from JSON.
/// Predicates are code and can only be attached afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReducerSettings {
    pub identity_key: String,
}

impl Default for ReducerSettings {
    fn default() -> Self {
        Self {
            identity_key: DEFAULT_IDENTITY_KEY.to_string(),
        }
    }
}

impl From<ReducerSettings> for ReducerConfig {
    fn from(settings: ReducerSettings) -> Self {
        Self::default().with_identity_key(settings.identity_key)
    }
}
