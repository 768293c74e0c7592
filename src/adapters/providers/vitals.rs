//! Vitals provider - simulated physiological and cabin readings.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::foundation::Timestamp;
use crate::domain::messaging::{Request, Response};
use crate::ports::{CapabilityProvider, ProviderDescriptor};

pub const VITALS_PROVIDER_ID: &str = "vitals_agent";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum VitalsAction {
    GetCurrent,
}

/// One snapshot of crew vitals and cabin atmosphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsReading {
    pub heart_rate: u32,
    pub o2_saturation: f64,
    pub stress_level: u32,
    pub o2_level: f64,
    pub co2_level: f64,
    pub temperature: f64,
    pub hr_variability: u32,
}

impl VitalsReading {
    /// Draw a plausible reading around resting baselines.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            heart_rate: rng.gen_range(62..=98),
            o2_saturation: round1(rng.gen_range(94.0..=99.5)),
            stress_level: rng.gen_range(15..=65),
            o2_level: round1(rng.gen_range(20.4..=21.2)),
            co2_level: round2(rng.gen_range(0.25..=0.55)),
            temperature: round1(rng.gen_range(36.3..=37.3)),
            hr_variability: rng.gen_range(38..=82),
        }
    }

    /// Readings outside their safe band.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !(50..=100).contains(&self.heart_rate) {
            warnings.push(format!("Heart rate out of range: {} bpm", self.heart_rate));
        }
        if self.o2_saturation < 95.0 {
            warnings.push(format!("Low oxygen saturation: {}%", self.o2_saturation));
        }
        if self.co2_level > 0.5 {
            warnings.push(format!("Elevated cabin CO2: {}%", self.co2_level));
        }
        if self.stress_level > 60 {
            warnings.push(format!("High stress level: {}", self.stress_level));
        }
        warnings
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Vitals capability provider.
#[derive(Debug, Default)]
pub struct VitalsProvider;

impl VitalsProvider {
    pub fn new() -> Self {
        Self
    }

    fn current(&self) -> Response {
        let reading = VitalsReading::sample(&mut rand::thread_rng());
        let warnings = reading.warnings();
        let status = if warnings.is_empty() { "normal" } else { "attention" };

        Response::ok(json!({
            "agent": VITALS_PROVIDER_ID,
            "vitals": reading,
            "status": status,
            "warnings": warnings,
            "timestamp": Timestamp::now().to_rfc3339(),
        }))
    }
}

#[async_trait]
impl CapabilityProvider for VitalsProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(VITALS_PROVIDER_ID, "Vitals Monitor", "monitoring")
            .with_capabilities(&["get_current"])
    }

    async fn process(&self, request: Request) -> Response {
        match request.parse::<VitalsAction>() {
            Ok(VitalsAction::GetCurrent) => self.current(),
            Err(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn calm() -> VitalsReading {
        VitalsReading {
            heart_rate: 70,
            o2_saturation: 98.0,
            stress_level: 30,
            o2_level: 20.9,
            co2_level: 0.3,
            temperature: 36.8,
            hr_variability: 60,
        }
    }

    #[test]
    fn calm_reading_has_no_warnings() {
        assert!(calm().warnings().is_empty());
    }

    #[test]
    fn out_of_band_readings_warn() {
        let reading = VitalsReading {
            heart_rate: 120,
            co2_level: 0.8,
            ..calm()
        };

        let warnings = reading.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("Heart rate"));
    }

    #[test]
    fn samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let reading = VitalsReading::sample(&mut rng);
            assert!((62..=98).contains(&reading.heart_rate));
            assert!(reading.o2_saturation <= 99.5);
        }
    }

    #[tokio::test]
    async fn get_current_returns_reading() {
        let response = VitalsProvider::new().process(Request::action("get_current")).await;

        assert!(!response.is_error());
        assert!(response.get("vitals").unwrap()["heart_rate"].is_u64());
    }

    #[tokio::test]
    async fn unknown_action_is_error() {
        let response = VitalsProvider::new().process(Request::action("get_history")).await;
        assert!(response.is_error());
    }
}
