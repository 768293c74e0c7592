//! CapabilityProvider port - Interface for independently addressable agents.
//!
//! Every agent in the system (vitals, mood, counselor, alerts, ...) exposes a
//! single operation, `process(request) -> response`, keyed by the `action`
//! field of the request. Providers must not block indefinitely and must encode
//! expected failures in the response rather than panicking.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ProviderId;
use crate::domain::messaging::{Request, Response};

/// Static description of a provider, reported by status queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Registry identity.
    pub agent_id: ProviderId,
    /// Human-readable name.
    pub name: String,
    /// Provider category (e.g. `monitoring`, `wellness`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Actions this provider understands.
    pub capabilities: Vec<String>,
}

impl ProviderDescriptor {
    /// Creates a descriptor with no capabilities.
    pub fn new(
        agent_id: impl Into<ProviderId>,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            name: name.into(),
            kind: kind.into(),
            capabilities: Vec::new(),
        }
    }

    /// Sets the list of supported actions.
    pub fn with_capabilities(mut self, capabilities: &[&str]) -> Self {
        self.capabilities = capabilities.iter().map(|c| c.to_string()).collect();
        self
    }
}

/// Port for a capability provider.
///
/// # Example
///
/// ```ignore
/// let response = provider.process(Request::action("get_current")).await;
/// if let Some(error) = response.error_message() {
///     tracing::warn!(error, "vitals unavailable");
/// }
/// ```
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// Describe this provider.
    fn descriptor(&self) -> ProviderDescriptor;

    /// Handle one request.
    ///
    /// Malformed or unsupported requests yield an error-bearing response.
    async fn process(&self, request: Request) -> Response;
}
