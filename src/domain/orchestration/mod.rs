//! Orchestration domain - provider registry and dispatcher.
//!
//! - [`registry`] - Insertion-ordered, write-once provider registry
//! - [`orchestrator`] - Dispatcher for meta and composite actions
//! - [`routing`] - Keyword routing table for free-form queries
//! - [`stats`] - Per-provider runtime statistics

pub mod orchestrator;
pub mod registry;
pub mod routing;
pub mod stats;

pub use orchestrator::{Orchestrator, OrchestratorAction, ORCHESTRATOR_ID, TASK_PROVIDER_KEY};
pub use registry::{ProviderHandle, ProviderRegistry};
pub use routing::{select_routes, Route, ROUTES};
pub use stats::{ProviderMetrics, ProviderState, ProviderStats, ProviderStatus};
