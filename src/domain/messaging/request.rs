//! Provider request envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised when a request cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Request must be a JSON object")]
    NotAnObject,

    #[error("Request is missing the 'action' field")]
    MissingAction,

    #[error("Invalid request for action '{action}': {reason}")]
    Invalid { action: String, reason: String },
}

/// A request addressed to a capability provider.
///
/// Always a JSON object. The `action` field selects the operation; every
/// other field is action-specific payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Request(Map<String, Value>);

impl Request {
    /// Creates a request for the given action with no payload.
    pub fn action(action: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("action".to_string(), Value::String(action.into()));
        Self(fields)
    }

    /// Adds a payload field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Wraps an arbitrary JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, RequestError> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(RequestError::NotAnObject),
        }
    }

    /// Returns the action name, if present and a string.
    pub fn action_name(&self) -> Option<&str> {
        self.0.get("action").and_then(Value::as_str)
    }

    /// Returns a payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a string payload field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Interprets the request as a provider's typed action enum.
    ///
    /// The target is expected to be tagged by `action`, e.g.
    /// `#[serde(tag = "action", rename_all = "snake_case")]`.
    pub fn parse<A: DeserializeOwned>(&self) -> Result<A, RequestError> {
        let action = self.action_name().ok_or(RequestError::MissingAction)?;
        serde_json::from_value(Value::Object(self.0.clone())).map_err(|e| RequestError::Invalid {
            action: action.to_string(),
            reason: e.to_string(),
        })
    }

    /// Consumes the request, returning the underlying JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
