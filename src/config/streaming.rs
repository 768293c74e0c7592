//! Streaming session configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Cadence and buffering for per-session streaming
#[derive(Debug, Clone, Deserialize)]
pub struct StreamingConfig {
    /// Interval between vitals pushes, in milliseconds
    #[serde(default = "default_vitals_interval")]
    pub vitals_interval_ms: u64,

    /// Interval between agent status pushes, in milliseconds
    #[serde(default = "default_status_interval")]
    pub status_interval_ms: u64,

    /// Capacity of each session's outbound queue
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

impl StreamingConfig {
    pub fn vitals_interval(&self) -> Duration {
        Duration::from_millis(self.vitals_interval_ms)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }

    /// Validate streaming configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.vitals_interval_ms == 0 {
            return Err(ValidationError::ZeroInterval("vitals"));
        }
        if self.status_interval_ms == 0 {
            return Err(ValidationError::ZeroInterval("status"));
        }
        if self.outbound_buffer == 0 {
            return Err(ValidationError::EmptyOutboundBuffer);
        }
        Ok(())
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            vitals_interval_ms: default_vitals_interval(),
            status_interval_ms: default_status_interval(),
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

fn default_vitals_interval() -> u64 {
    2_000
}

fn default_status_interval() -> u64 {
    5_000
}

fn default_outbound_buffer() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_defaults() {
        let config = StreamingConfig::default();
        assert_eq!(config.vitals_interval(), Duration::from_secs(2));
        assert_eq!(config.status_interval(), Duration::from_secs(5));
        assert_eq!(config.outbound_buffer, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = StreamingConfig {
            status_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::ZeroInterval("status"))
        );
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let config = StreamingConfig {
            outbound_buffer: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
