//! Sleep provider - simulated sleep-cycle analysis.

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use serde_json::json;

use crate::domain::foundation::Timestamp;
use crate::domain::messaging::{Request, Response};
use crate::ports::{CapabilityProvider, ProviderDescriptor};

pub const SLEEP_PROVIDER_ID: &str = "sleep_agent";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum SleepAction {
    AnalyzeSleep,
}

/// Recommendations for a night of the given length and quality score.
pub fn recommendations(duration_hours: f64, quality: u32) -> Vec<&'static str> {
    let mut advice = Vec::new();
    if duration_hours < 6.5 {
        advice.push("Extend the sleep window by 30 minutes tonight");
    }
    if quality < 70 {
        advice.push("Dim cabin lighting 60 minutes before rest");
        advice.push("Avoid caffeine after mid-shift");
    }
    if advice.is_empty() {
        advice.push("Keep the current sleep schedule");
    }
    advice
}

/// Sleep capability provider.
#[derive(Debug, Default)]
pub struct SleepProvider;

impl SleepProvider {
    pub fn new() -> Self {
        Self
    }

    fn analyze(&self) -> Response {
        let mut rng = rand::thread_rng();
        let duration_hours = (rng.gen_range(5.5..=8.5_f64) * 10.0).round() / 10.0;
        let quality: u32 = rng.gen_range(55..=95);
        let deep_sleep_pct: u32 = rng.gen_range(12..=25);
        let awakenings: u32 = rng.gen_range(0..=4);

        Response::ok(json!({
            "agent": SLEEP_PROVIDER_ID,
            "analysis": {
                "duration_hours": duration_hours,
                "quality": quality,
                "deep_sleep_percentage": deep_sleep_pct,
                "awakenings": awakenings,
                "recommendations": recommendations(duration_hours, quality),
            },
            "timestamp": Timestamp::now().to_rfc3339(),
        }))
    }
}

#[async_trait]
impl CapabilityProvider for SleepProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(SLEEP_PROVIDER_ID, "Sleep Analyst", "wellness")
            .with_capabilities(&["analyze_sleep"])
    }

    async fn process(&self, request: Request) -> Response {
        match request.parse::<SleepAction>() {
            Ok(SleepAction::AnalyzeSleep) => self.analyze(),
            Err(e) => e.into(),
        }
    }
}
