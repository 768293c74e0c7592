//! Digital twin provider - short-horizon health projections.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::foundation::Timestamp;
use crate::domain::messaging::{Request, Response};
use crate::ports::{CapabilityProvider, ProviderDescriptor};

pub const DIGITAL_TWIN_PROVIDER_ID: &str = "digital_twin";

/// Longest horizon the model will project.
pub const MAX_HORIZON_HOURS: u32 = 168;

const STEP_HOURS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum TwinAction {
    PredictHealth {
        #[serde(default = "default_hours")]
        hours: u32,
    },
}

fn default_hours() -> u32 {
    24
}

/// Projected state at one point of the horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub hours_ahead: u32,
    pub at: Timestamp,
    pub fatigue: f64,
    pub stress: f64,
    pub risk_level: &'static str,
}

/// Project fatigue and stress forward in fixed steps.
///
/// Fatigue accumulates through the waking day and resets on each 24-hour
/// boundary; stress drifts slowly upward with mission time.
pub fn project(now: Timestamp, hours: u32) -> Vec<Projection> {
    (1..=hours.div_ceil(STEP_HOURS))
        .map(|step| {
            let hours_ahead = (step * STEP_HOURS).min(hours);
            let within_day = f64::from(hours_ahead % 24);
            let fatigue = (20.0 + within_day * 3.0).min(100.0);
            let stress = (30.0 + f64::from(hours_ahead) * 0.1).min(100.0);
            let risk_level = match fatigue.max(stress) {
                s if s >= 75.0 => "elevated",
                s if s >= 50.0 => "moderate",
                _ => "low",
            };
            Projection {
                hours_ahead,
                at: now.plus_hours(i64::from(hours_ahead)),
                fatigue,
                stress,
                risk_level,
            }
        })
        .collect()
}

/// Digital twin capability provider.
#[derive(Debug, Default)]
pub struct DigitalTwinProvider;

impl DigitalTwinProvider {
    pub fn new() -> Self {
        Self
    }

    fn predict(&self, hours: u32) -> Response {
        if hours == 0 || hours > MAX_HORIZON_HOURS {
            return Response::error(format!(
                "hours must be between 1 and {MAX_HORIZON_HOURS}, got {hours}"
            ));
        }

        let projections = project(Timestamp::now(), hours);
        let peak_risk = projections
            .iter()
            .map(|p| p.risk_level)
            .max_by_key(|level| match *level {
                "elevated" => 2,
                "moderate" => 1,
                _ => 0,
            })
            .unwrap_or("low");

        Response::ok(json!({
            "agent": DIGITAL_TWIN_PROVIDER_ID,
            "horizon_hours": hours,
            "peak_risk": peak_risk,
            "predictions": projections,
            "timestamp": Timestamp::now().to_rfc3339(),
        }))
    }
}

#[async_trait]
impl CapabilityProvider for DigitalTwinProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(DIGITAL_TWIN_PROVIDER_ID, "Digital Twin", "predictive")
            .with_capabilities(&["predict_health"])
    }

    async fn process(&self, request: Request) -> Response {
        match request.parse::<TwinAction>() {
            Ok(TwinAction::PredictHealth { hours }) => self.predict(hours),
            Err(e) => e.into(),
        }
    }
}
