//! Verb dispatch: binds a schema and configuration to the five transition
//! functions and routes incoming requests to them.

use std::fmt;
use std::str::FromStr;

use restful_model::{Entity, EntitySanitizer, Fields};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ReducerConfig;
use crate::error::{ReducerError, Result};
use crate::transitions;

/// REST verbs the reducer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    pub const ALL: [Verb; 5] = [Self::Get, Self::Post, Self::Put, Self::Patch, Self::Delete];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }

    /// True for verbs whose repeated application has no further effect.
    #[must_use]
    pub fn is_idempotent(self) -> bool {
        !matches!(self, Self::Post)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = ReducerError;

    /// Case-insensitive, so `"PUT"` and `"put"` both parse.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ReducerError::UnknownVerb(s.to_string()))
    }
}

/// An incoming request: verb, route params and payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub verb: Verb,
    #[serde(default)]
    pub params: Fields,
    #[serde(default)]
    pub body: Fields,
}

impl Request {
    #[must_use]
    pub fn new(verb: Verb, params: Fields, body: Fields) -> Self {
        Self { verb, params, body }
    }

    /// Builds a request from a verb name, failing on names that are not verbs.
    pub fn parse(verb: &str, params: Fields, body: Fields) -> Result<Self> {
        Ok(Self::new(verb.parse()?, params, body))
    }

    #[must_use]
    pub fn get() -> Self {
        Self::new(Verb::Get, Fields::new(), Fields::new())
    }

    #[must_use]
    pub fn post(body: Fields) -> Self {
        Self::new(Verb::Post, Fields::new(), body)
    }

    #[must_use]
    pub fn put(params: Fields, body: Fields) -> Self {
        Self::new(Verb::Put, params, body)
    }

    #[must_use]
    pub fn patch(params: Fields, body: Fields) -> Self {
        Self::new(Verb::Patch, params, body)
    }

    #[must_use]
    pub fn delete(params: Fields) -> Self {
        Self::new(Verb::Delete, params, Fields::new())
    }
}

/// Action identifiers of the surrounding framework, one per verb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionNames {
    pub get: String,
    pub post: String,
    pub put: String,
    pub patch: String,
    pub delete: String,
}

impl ActionNames {
    /// Names of the form `"{resource}/{verb}"`, e.g. `"posts/patch"`.
    #[must_use]
    pub fn prefixed(resource: &str) -> Self {
        let name = |verb: Verb| format!("{resource}/{verb}");
        Self {
            get: name(Verb::Get),
            post: name(Verb::Post),
            put: name(Verb::Put),
            patch: name(Verb::Patch),
            delete: name(Verb::Delete),
        }
    }

    #[must_use]
    pub fn name(&self, verb: Verb) -> &str {
        match verb {
            Verb::Get => &self.get,
            Verb::Post => &self.post,
            Verb::Put => &self.put,
            Verb::Patch => &self.patch,
            Verb::Delete => &self.delete,
        }
    }

    /// The verb bound to `action`, if any.
    #[must_use]
    pub fn resolve(&self, action: &str) -> Option<Verb> {
        Verb::ALL.into_iter().find(|&v| self.name(v) == action)
    }
}

/// A collection type: a schema and configuration bound to the transition
/// functions.
#[derive(Debug, Clone)]
pub struct RestfulResource<S> {
    schema: S,
    config: ReducerConfig,
    actions: Option<ActionNames>,
}

impl<S: EntitySanitizer> RestfulResource<S> {
    /// Binds `schema` with the default configuration.
    pub fn new(schema: S) -> Self {
        Self {
            schema,
            config: ReducerConfig::default(),
            actions: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ReducerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_actions(mut self, actions: ActionNames) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn config(&self) -> &ReducerConfig {
        &self.config
    }

    pub fn actions(&self) -> Option<&ActionNames> {
        self.actions.as_ref()
    }

    pub fn retrieve(&self, state: &[Entity]) -> Vec<Entity> {
        transitions::retrieve(state, &self.config)
    }

    pub fn create(&self, state: &[Entity], body: &Fields) -> Result<Vec<Entity>> {
        transitions::create(state, body, &self.schema, &self.config)
    }

    pub fn replace(&self, state: &[Entity], params: &Fields, body: &Fields) -> Result<Vec<Entity>> {
        transitions::replace(state, params, body, &self.schema, &self.config)
    }

    pub fn merge(&self, state: &[Entity], params: &Fields, body: &Fields) -> Result<Vec<Entity>> {
        transitions::merge(state, params, body, &self.schema, &self.config)
    }

    pub fn remove(&self, state: &[Entity], params: &Fields) -> Vec<Entity> {
        transitions::remove(state, params, &self.config)
    }

    /// Routes `request` to the transition for its verb.
    pub fn apply(&self, state: &[Entity], request: &Request) -> Result<Vec<Entity>> {
        debug!(verb = %request.verb, count = state.len(), "Dispatching request");
        match request.verb {
            Verb::Get => Ok(self.retrieve(state)),
            Verb::Post => self.create(state, &request.body),
            Verb::Put => self.replace(state, &request.params, &request.body),
            Verb::Patch => self.merge(state, &request.params, &request.body),
            Verb::Delete => Ok(self.remove(state, &request.params)),
        }
    }

    /// Routes a framework action by name through the bound [`ActionNames`].
    pub fn apply_action(
        &self,
        state: &[Entity],
        action: &str,
        params: Fields,
        body: Fields,
    ) -> Result<Vec<Entity>> {
        let verb = self
            .actions
            .as_ref()
            .and_then(|a| a.resolve(action))
            .ok_or_else(|| ReducerError::UnknownAction(action.to_string()))?;
        self.apply(state, &Request::new(verb, params, body))
    }
}
