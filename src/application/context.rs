//! Shared application context handed to HTTP and WebSocket handlers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::adapters::providers::register_defaults;
use crate::adapters::websocket::ConnectionManager;
use crate::config::StreamingConfig;
use crate::domain::foundation::RegistryError;
use crate::domain::orchestration::{Orchestrator, ProviderRegistry};

/// Everything a request or session needs, cheap to clone.
#[derive(Clone)]
pub struct AppContext {
    pub registry: Arc<ProviderRegistry>,

    /// Absent until the system has finished starting up.
    pub orchestrator: Option<Arc<Orchestrator>>,

    pub connections: Arc<ConnectionManager>,
    pub streaming: StreamingConfig,
}

impl AppContext {
    /// Context with an orchestrator over `registry`.
    pub fn new(registry: Arc<ProviderRegistry>, streaming: StreamingConfig) -> Self {
        let orchestrator = Arc::new(Orchestrator::new(registry.clone()));
        Self {
            orchestrator: Some(orchestrator),
            ..Self::without_orchestrator(registry, streaming)
        }
    }

    /// Context whose orchestrator has not been created.
    pub fn without_orchestrator(registry: Arc<ProviderRegistry>, streaming: StreamingConfig) -> Self {
        Self {
            registry,
            orchestrator: None,
            connections: Arc::new(ConnectionManager::default()),
            streaming,
        }
    }

    /// Context over the full default provider set.
    pub fn with_default_providers(streaming: StreamingConfig) -> Result<Self, RegistryError> {
        let mut registry = ProviderRegistry::new();
        register_defaults(&mut registry)?;
        Ok(Self::new(Arc::new(registry), streaming))
    }

    /// Tie every session scope to a process-wide shutdown token.
    ///
    /// Must be applied before any session connects.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.connections = Arc::new(ConnectionManager::new(shutdown));
        self
    }
}
