//! Background event simulator configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Settings for the synthetic alert generator
#[derive(Debug, Clone, Deserialize)]
pub struct SimulatorConfig {
    /// Whether the simulator runs at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Seconds between rolls
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Chance that a roll produces an alert
    #[serde(default = "default_alert_probability")]
    pub alert_probability: f64,
}

impl SimulatorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Validate simulator configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_secs == 0 {
            return Err(ValidationError::ZeroInterval("simulator"));
        }
        if !(0.0..=1.0).contains(&self.alert_probability) {
            return Err(ValidationError::InvalidProbability(self.alert_probability));
        }
        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval(),
            alert_probability: default_alert_probability(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    30
}

fn default_alert_probability() -> f64 {
    0.1
}
