//! Ordered alert severity scale.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Alert severity, ordered from least to most severe.
///
/// Carried on the wire as its numeric level (1..=5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info = 1,
    Low = 2,
    Medium = 3,
    High = 4,
    Critical = 5,
}

impl Severity {
    /// Numeric level on the 1..=5 scale.
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Parse a numeric level.
    pub fn from_level(level: u64) -> Option<Self> {
        match level {
            1 => Some(Severity::Info),
            2 => Some(Severity::Low),
            3 => Some(Severity::Medium),
            4 => Some(Severity::High),
            5 => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.level())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let level = u64::deserialize(deserializer)?;
        Severity::from_level(level).ok_or_else(|| {
            serde::de::Error::custom(format!("severity must be between 1 and 5, got {level}"))
        })
    }
}
