//! Mock capability provider for testing.
//!
//! Answers configured actions with canned responses and records every request
//! it receives, so tests can assert on exactly what was routed to it.
//!
//! # Example
//!
//! ```ignore
//! let mood = MockProvider::new("mood_agent")
//!     .with_response("analyze_mood", json!({"mood_analysis": {"emotion": "happy"}}));
//! registry.register(mood.clone())?;
//! // ... exercise the system ...
//! assert_eq!(mood.call_count(), 1);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::ProviderId;
use crate::domain::messaging::{Request, Response};
use crate::ports::{CapabilityProvider, ProviderDescriptor};

/// Configurable mock provider.
///
/// Clones share the call log, so a test can keep one clone and register
/// another.
#[derive(Debug, Clone)]
pub struct MockProvider {
    descriptor: ProviderDescriptor,
    responses: HashMap<String, Value>,
    delay: Duration,
    calls: Arc<Mutex<Vec<Request>>>,
}

impl MockProvider {
    /// Creates a mock with the given identity and no configured actions.
    pub fn new(id: impl Into<ProviderId>) -> Self {
        let id = id.into();
        let descriptor = ProviderDescriptor::new(id.clone(), format!("Mock {id}"), "mock");
        Self {
            descriptor,
            responses: HashMap::new(),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer `action` with `response` (every time it is called).
    pub fn with_response(mut self, action: impl Into<String>, response: Value) -> Self {
        let action = action.into();
        self.descriptor.capabilities.push(action.clone());
        self.responses.insert(action, response);
        self
    }

    /// Simulate provider latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Requests received so far, in order.
    pub fn calls(&self) -> Vec<Request> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of requests received for one action.
    pub fn calls_for(&self, action: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.action_name() == Some(action))
            .count()
    }
}

#[async_trait]
impl CapabilityProvider for MockProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        self.descriptor.clone()
    }

    async fn process(&self, request: Request) -> Response {
        let action = request.action_name().map(str::to_string);
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match action.as_deref().and_then(|a| self.responses.get(a)) {
            Some(response) => Response::ok(response.clone()),
            None => Response::error(format!(
                "Unsupported action: {}",
                action.as_deref().unwrap_or("<missing>")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn configured_action_returns_response() {
        let mock = MockProvider::new("vitals_agent").with_response("get_current", json!({"hr": 60}));

        let response = mock.process(Request::action("get_current")).await;

        assert_eq!(response.into_value(), json!({"hr": 60}));
    }

    #[tokio::test]
    async fn unconfigured_action_is_error() {
        let mock = MockProvider::new("vitals_agent");
        let response = mock.process(Request::action("get_current")).await;

        assert_eq!(response.error_message(), Some("Unsupported action: get_current"));
    }

    #[tokio::test]
    async fn clones_share_call_log() {
        let mock = MockProvider::new("mood_agent");
        let registered = mock.clone();

        registered.process(Request::action("analyze_mood")).await;
        registered.process(Request::action("get_mood_trend")).await;

        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.calls_for("analyze_mood"), 1);
    }
}
