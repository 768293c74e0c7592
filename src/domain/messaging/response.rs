//! Provider response envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::DispatchError;

use super::RequestError;

/// A response returned by a capability provider.
///
/// The presence of an `error` field signals failure; no other field is
/// reserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Response(Map<String, Value>);

impl Response {
    /// Creates a successful response.
    ///
    /// Objects are used as-is; any other value is wrapped as `{"result": value}`.
    pub fn ok(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            other => {
                let mut fields = Map::new();
                fields.insert("result".to_string(), other);
                Self(fields)
            }
        }
    }

    /// Creates an error-bearing response.
    pub fn error(message: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("error".to_string(), Value::String(message.into()));
        Self(fields)
    }

    /// Returns true when the response signals failure.
    pub fn is_error(&self) -> bool {
        self.0.contains_key("error")
    }

    /// Returns the error message, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.0.get("error").and_then(Value::as_str)
    }

    /// Returns a field of the response.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Consumes the response, returning the underlying JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<DispatchError> for Response {
    fn from(err: DispatchError) -> Self {
        Response::error(err.to_string())
    }
}

impl From<RequestError> for Response {
    fn from(err: RequestError) -> Self {
        Response::error(err.to_string())
    }
}
