//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the orchestration domain and the outside world. Adapters implement these
//! ports.
//!
//! - `CapabilityProvider` - An agent answering `process(request) -> response`

mod capability_provider;

pub use capability_provider::{CapabilityProvider, ProviderDescriptor};
