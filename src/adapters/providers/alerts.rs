//! Alert provider - owns the in-memory alert log.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::alerts::{Alert, AlertId, AlertStatusFilter, Severity};
use crate::domain::foundation::Timestamp;
use crate::domain::messaging::{Request, Response};
use crate::ports::{CapabilityProvider, ProviderDescriptor};

pub const ALERT_PROVIDER_ID: &str = "alert_agent";

/// Alerts kept before the oldest are discarded.
const DEFAULT_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum AlertAction {
    CreateAlert {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default = "default_severity")]
        severity: Severity,
        message: String,
        #[serde(default = "default_source")]
        source: String,
    },
    GetAlerts {
        #[serde(default)]
        status: AlertStatusFilter,
    },
    AcknowledgeAlert {
        alert_id: AlertId,
    },
    ResolveAlert {
        alert_id: AlertId,
    },
}

fn default_severity() -> Severity {
    Severity::Medium
}

fn default_source() -> String {
    "manual".to_string()
}

/// Alert capability provider.
#[derive(Debug)]
pub struct AlertProvider {
    alerts: RwLock<Vec<Alert>>,
    capacity: usize,
}

impl AlertProvider {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create with a bound on retained alerts.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            alerts: RwLock::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    async fn create(&self, alert: Alert) -> Response {
        tracing::info!(
            alert_id = %alert.id,
            kind = %alert.kind,
            severity = alert.severity.name(),
            source = %alert.source,
            "Alert raised"
        );

        let mut alerts = self.alerts.write().await;
        alerts.push(alert.clone());
        if alerts.len() > self.capacity {
            let excess = alerts.len() - self.capacity;
            alerts.drain(..excess);
        }

        Response::ok(json!({
            "agent": ALERT_PROVIDER_ID,
            "created": true,
            "alert": alert,
        }))
    }

    async fn list(&self, filter: AlertStatusFilter) -> Response {
        let alerts = self.alerts.read().await;
        let selected: Vec<&Alert> = alerts.iter().rev().filter(|a| filter.admits(a)).collect();

        Response::ok(json!({
            "agent": ALERT_PROVIDER_ID,
            "count": selected.len(),
            "alerts": selected,
            "timestamp": Timestamp::now().to_rfc3339(),
        }))
    }

    async fn update(&self, alert_id: AlertId, apply: fn(&mut Alert)) -> Response {
        let mut alerts = self.alerts.write().await;
        match alerts.iter_mut().find(|a| a.id == alert_id) {
            Some(alert) => {
                apply(alert);
                Response::ok(json!({
                    "agent": ALERT_PROVIDER_ID,
                    "alert": alert,
                }))
            }
            None => Response::error(format!("Alert '{alert_id}' not found")),
        }
    }
}

impl Default for AlertProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilityProvider for AlertProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(ALERT_PROVIDER_ID, "Alert Manager", "safety").with_capabilities(&[
            "create_alert",
            "get_alerts",
            "acknowledge_alert",
            "resolve_alert",
        ])
    }

    async fn process(&self, request: Request) -> Response {
        let action = match request.parse::<AlertAction>() {
            Ok(action) => action,
            Err(e) => return e.into(),
        };

        match action {
            AlertAction::CreateAlert {
                kind,
                severity,
                message,
                source,
            } => self.create(Alert::new(kind, severity, message, source)).await,
            AlertAction::GetAlerts { status } => self.list(status).await,
            AlertAction::AcknowledgeAlert { alert_id } => {
                self.update(alert_id, Alert::acknowledge).await
            }
            AlertAction::ResolveAlert { alert_id } => self.update(alert_id, Alert::resolve).await,
        }
    }
}
