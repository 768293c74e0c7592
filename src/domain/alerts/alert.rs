//! Alert record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::Timestamp;

use super::Severity;

/// Unique identifier for an alert.
pub type AlertId = Uuid;

/// An alert owned by the alert provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub severity_name: String,
    pub message: String,
    pub source: String,
    pub created_at: Timestamp,
    pub acknowledged: bool,
    pub resolved: bool,
}

impl Alert {
    /// Raise a new, unacknowledged alert.
    pub fn new(
        kind: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            severity,
            severity_name: severity.name().to_string(),
            message: message.into(),
            source: source.into(),
            created_at: Timestamp::now(),
            acknowledged: false,
            resolved: false,
        }
    }

    /// An alert is active until it has been resolved.
    pub fn is_active(&self) -> bool {
        !self.resolved
    }

    /// Mark as seen by the crew.
    pub fn acknowledge(&mut self) {
        self.acknowledged = true;
    }

    /// Mark as resolved; resolving implies acknowledgement.
    pub fn resolve(&mut self) {
        self.acknowledged = true;
        self.resolved = true;
    }
}

/// Which alerts a query should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatusFilter {
    #[default]
    Active,
    All,
}

impl AlertStatusFilter {
    /// Check whether an alert passes the filter.
    pub fn admits(self, alert: &Alert) -> bool {
        match self {
            AlertStatusFilter::Active => alert.is_active(),
            AlertStatusFilter::All => true,
        }
    }
}
