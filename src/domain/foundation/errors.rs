//! Error types for the domain layer.

use thiserror::Error;

use super::ProviderId;

/// Failures raised while routing a request to a capability provider.
///
/// These never escape the dispatcher as faults: they are converted into
/// error-bearing responses at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No provider is registered under the requested identity.
    #[error("Agent '{0}' not found")]
    NotFound(ProviderId),

    /// A required collaborator has not been initialized.
    #[error("{0} is not available")]
    Unavailable(String),

    /// The delegated task could not be routed.
    #[error("Invalid task: {0}")]
    InvalidTask(String),
}

impl DispatchError {
    /// Creates a not-found error for the given identity.
    pub fn not_found(id: impl Into<ProviderId>) -> Self {
        DispatchError::NotFound(id.into())
    }

    /// Creates an invalid-task error.
    pub fn invalid_task(reason: impl Into<String>) -> Self {
        DispatchError::InvalidTask(reason.into())
    }
}

/// Errors raised while building the provider registry at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Provider '{0}' is already registered")]
    DuplicateProvider(ProviderId),

    #[error("Provider identity '{0}' is reserved")]
    ReservedIdentity(ProviderId),
}
