//! Social provider - crew morale snapshot.

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use serde_json::json;

use crate::domain::foundation::Timestamp;
use crate::domain::messaging::{Request, Response};
use crate::ports::{CapabilityProvider, ProviderDescriptor};

pub const SOCIAL_PROVIDER_ID: &str = "social_agent";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum SocialAction {
    GetMorale,
}

/// Morale band for a 0..=100 score.
pub fn morale_level(score: u32) -> &'static str {
    match score {
        0..=39 => "low",
        40..=69 => "moderate",
        _ => "high",
    }
}

/// Social capability provider.
#[derive(Debug, Default)]
pub struct SocialProvider;

impl SocialProvider {
    pub fn new() -> Self {
        Self
    }

    fn morale(&self) -> Response {
        let mut rng = rand::thread_rng();
        let score: u32 = rng.gen_range(45..=92);
        let cohesion: u32 = rng.gen_range(50..=95);
        let days_since_contact: u32 = rng.gen_range(0..=6);

        let mut suggestions = vec!["Schedule a shared crew meal"];
        if days_since_contact >= 3 {
            suggestions.push("Book a family video call");
        }
        if score < 60 {
            suggestions.push("Plan a crew movie night");
        }

        Response::ok(json!({
            "agent": SOCIAL_PROVIDER_ID,
            "morale": {
                "score": score,
                "level": morale_level(score),
                "team_cohesion": cohesion,
                "days_since_family_contact": days_since_contact,
                "suggestions": suggestions,
            },
            "timestamp": Timestamp::now().to_rfc3339(),
        }))
    }
}

#[async_trait]
impl CapabilityProvider for SocialProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(SOCIAL_PROVIDER_ID, "Social Connector", "psychological")
            .with_capabilities(&["get_morale"])
    }

    async fn process(&self, request: Request) -> Response {
        match request.parse::<SocialAction>() {
            Ok(SocialAction::GetMorale) => self.morale(),
            Err(e) => e.into(),
        }
    }
}
