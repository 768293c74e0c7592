//! Runtime statistics recorded for every provider call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ports::ProviderDescriptor;

/// Lock-free counters updated on every call through a provider handle.
#[derive(Debug, Default)]
pub struct ProviderStats {
    tasks_processed: AtomicU64,
    errors: AtomicU64,
    total_response_micros: AtomicU64,
}

impl ProviderStats {
    /// Create zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed call.
    pub fn record(&self, elapsed: Duration, failed: bool) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.tasks_processed.fetch_add(1, Ordering::Relaxed);
        self.total_response_micros
            .fetch_add(micros, Ordering::Relaxed);
        if failed {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Number of calls recorded so far.
    pub fn tasks_processed(&self) -> u64 {
        self.tasks_processed.load(Ordering::Relaxed)
    }

    /// Snapshot the counters as reportable metrics.
    pub fn snapshot(&self) -> ProviderMetrics {
        let tasks = self.tasks_processed.load(Ordering::Relaxed);
        let errors = self.errors.load(Ordering::Relaxed);
        let micros = self.total_response_micros.load(Ordering::Relaxed);

        if tasks == 0 {
            return ProviderMetrics::default();
        }

        ProviderMetrics {
            tasks_processed: tasks,
            avg_response_time: micros as f64 / tasks as f64 / 1000.0,
            error_rate: errors as f64 / tasks as f64,
        }
    }
}

/// Reportable provider metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetrics {
    pub tasks_processed: u64,
    /// Mean response time in milliseconds.
    pub avg_response_time: f64,
    /// Fraction of calls that returned an error response.
    pub error_rate: f64,
}

/// Liveness state of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderState {
    /// Registered, no task handled yet.
    Idle,
    /// Has handled at least one task.
    Active,
}

/// Status entry reported for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderStatus {
    #[serde(flatten)]
    pub descriptor: ProviderDescriptor,
    pub state: ProviderState,
    pub status_message: String,
    pub metrics: ProviderMetrics,
}

impl ProviderStatus {
    /// Build a status entry from a descriptor and its counters.
    pub fn new(descriptor: ProviderDescriptor, stats: &ProviderStats) -> Self {
        let metrics = stats.snapshot();
        let (state, status_message) = if metrics.tasks_processed == 0 {
            (ProviderState::Idle, "Ready".to_string())
        } else {
            (
                ProviderState::Active,
                format!("Processed {} tasks", metrics.tasks_processed),
            )
        };

        Self {
            descriptor,
            state,
            status_message,
            metrics,
        }
    }
}
