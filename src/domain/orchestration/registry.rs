//! Provider registry - the set of capability providers keyed by identity.
//!
//! The registry is populated once during startup and shared read-only behind
//! an `Arc` afterwards, so no locking is needed on the dispatch path.
//! Enumeration follows registration order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::foundation::{ProviderId, RegistryError};
use crate::domain::messaging::{Request, Response};
use crate::ports::{CapabilityProvider, ProviderDescriptor};

use super::orchestrator::ORCHESTRATOR_ID;
use super::stats::{ProviderStats, ProviderStatus};

/// A registered provider together with its runtime statistics.
///
/// Every call, whether made directly by a caller that knows the provider or
/// routed by the orchestrator, goes through [`ProviderHandle::process`].
pub struct ProviderHandle {
    provider: Arc<dyn CapabilityProvider>,
    descriptor: ProviderDescriptor,
    stats: ProviderStats,
}

impl ProviderHandle {
    fn new(provider: Arc<dyn CapabilityProvider>) -> Self {
        let descriptor = provider.descriptor();
        Self {
            provider,
            descriptor,
            stats: ProviderStats::new(),
        }
    }

    /// Registry identity of this provider.
    pub fn id(&self) -> &ProviderId {
        &self.descriptor.agent_id
    }

    /// Static description captured at registration.
    pub fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    /// Current status and metrics.
    pub fn status(&self) -> ProviderStatus {
        ProviderStatus::new(self.descriptor.clone(), &self.stats)
    }

    /// Forward a request to the provider, recording statistics.
    pub async fn process(&self, request: Request) -> Response {
        let action = request.action_name().unwrap_or_default().to_string();
        let started = Instant::now();

        let response = self.provider.process(request).await;

        let failed = response.is_error();
        self.stats.record(started.elapsed(), failed);
        if failed {
            tracing::debug!(
                provider = %self.descriptor.agent_id,
                action,
                error = response.error_message().unwrap_or_default(),
                "Provider returned an error response"
            );
        }

        response
    }
}

impl std::fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("descriptor", &self.descriptor)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Insertion-ordered mapping from provider identity to provider.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<ProviderHandle>>,
    index: HashMap<ProviderId, usize>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under the identity reported by its descriptor.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateProvider` if the identity is taken, or
    /// `RegistryError::ReservedIdentity` for the orchestrator's own identity.
    pub fn register(
        &mut self,
        provider: impl CapabilityProvider + 'static,
    ) -> Result<(), RegistryError> {
        self.register_shared(Arc::new(provider))
    }

    /// Register a provider that is also held elsewhere (e.g. by a test).
    pub fn register_shared(
        &mut self,
        provider: Arc<dyn CapabilityProvider>,
    ) -> Result<(), RegistryError> {
        let handle = ProviderHandle::new(provider);
        let id = handle.id().clone();

        if id.as_str() == ORCHESTRATOR_ID {
            return Err(RegistryError::ReservedIdentity(id));
        }
        if self.index.contains_key(&id) {
            return Err(RegistryError::DuplicateProvider(id));
        }

        tracing::debug!(provider = %id, "Registered provider");
        self.index.insert(id, self.providers.len());
        self.providers.push(Arc::new(handle));
        Ok(())
    }

    /// Look up a provider by identity.
    pub fn get(&self, id: &str) -> Option<&Arc<ProviderHandle>> {
        self.index.get(id).map(|&position| &self.providers[position])
    }

    /// Check whether an identity is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate providers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ProviderHandle>> {
        self.providers.iter()
    }

    /// Registered identities in registration order.
    pub fn ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|h| h.id().clone()).collect()
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check whether no providers are registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
