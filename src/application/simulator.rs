//! Background event simulator.
//!
//! Periodically rolls for a synthetic monitoring event and, when one fires,
//! raises it with the alert provider and broadcasts the created alert to
//! sessions subscribed to the alerts topic.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::adapters::providers::ALERT_PROVIDER_ID;
use crate::adapters::websocket::{ConnectionManager, ServerMessage, Topic};
use crate::config::SimulatorConfig;
use crate::domain::messaging::{Request, Response};
use crate::domain::orchestration::ProviderRegistry;

use super::AppContext;

/// Source tag carried by every simulated alert.
pub const SIMULATOR_SOURCE: &str = "background_monitor";

/// Severity of every simulated alert (high).
pub const SIMULATED_SEVERITY: u8 = 4;

/// Kind of synthetic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticEvent {
    Vitals,
    System,
    Environmental,
}

impl SyntheticEvent {
    pub const ALL: [SyntheticEvent; 3] = [
        SyntheticEvent::Vitals,
        SyntheticEvent::System,
        SyntheticEvent::Environmental,
    ];

    /// Alert type sent to the alert provider.
    pub fn kind(self) -> &'static str {
        match self {
            SyntheticEvent::Vitals => "vitals",
            SyntheticEvent::System => "system",
            SyntheticEvent::Environmental => "environmental",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SyntheticEvent::Vitals => "Slight heart rate elevation detected",
            SyntheticEvent::System => "Routine system check completed",
            SyntheticEvent::Environmental => "Air quality within normal parameters",
        }
    }

    fn request(self) -> Request {
        Request::action("create_alert")
            .with("type", self.kind())
            .with("severity", SIMULATED_SEVERITY)
            .with("message", self.message())
            .with("source", SIMULATOR_SOURCE)
    }
}

/// Generates synthetic alerts until shutdown.
pub struct EventSimulator {
    registry: Arc<ProviderRegistry>,
    connections: Arc<ConnectionManager>,
    config: SimulatorConfig,
}

impl EventSimulator {
    pub fn new(ctx: &AppContext, config: SimulatorConfig) -> Self {
        Self {
            registry: ctx.registry.clone(),
            connections: ctx.connections.clone(),
            config,
        }
    }

    /// Roll once: an event with probability `alert_probability`, drawn
    /// uniformly among the event kinds.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<SyntheticEvent> {
        if rng.gen::<f64>() >= self.config.alert_probability {
            return None;
        }
        let index = rng.gen_range(0..SyntheticEvent::ALL.len());
        Some(SyntheticEvent::ALL[index])
    }

    /// Raise `event` with the alert provider and broadcast the created alert.
    ///
    /// Returns `None` when no alert provider is registered.
    pub async fn emit(&self, event: SyntheticEvent) -> Option<Response> {
        let alerts = self.registry.get(ALERT_PROVIDER_ID)?;
        let response = alerts.process(event.request()).await;

        if response.is_error() {
            tracing::warn!(
                kind = event.kind(),
                error = response.error_message().unwrap_or_default(),
                "Alert provider rejected simulated event"
            );
            return Some(response);
        }

        let alert = response.get("alert").cloned().unwrap_or(Value::Null);
        let delivered = self
            .connections
            .broadcast(Topic::Alerts, ServerMessage::alert(alert))
            .await;
        tracing::debug!(kind = event.kind(), delivered, "Simulated alert broadcast");

        Some(response)
    }

    /// Run until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut rng = StdRng::from_entropy();
        let period = self.config.interval();
        tracing::info!(
            interval_secs = self.config.interval_secs,
            probability = self.config.alert_probability,
            "Event simulator started"
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(period) => {}
            }

            if let Some(event) = self.roll(&mut rng) {
                self.emit(event).await;
            }
        }

        tracing::info!("Event simulator stopped");
    }
}
