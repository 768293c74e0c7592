//! Counselor provider - supportive replies tuned to the detected emotion.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::domain::foundation::Timestamp;
use crate::domain::messaging::{Request, Response};
use crate::ports::{CapabilityProvider, ProviderDescriptor};

pub const COUNSELOR_PROVIDER_ID: &str = "counselor_agent";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum CounselorAction {
    Chat {
        #[serde(default)]
        message: String,
        #[serde(default = "default_emotion")]
        emotion: String,
    },
}

fn default_emotion() -> String {
    "neutral".to_string()
}

/// Reply text and the technique it applies, keyed by emotion.
fn reply_for(emotion: &str) -> (&'static str, &'static str) {
    match emotion {
        "happy" => (
            "That's wonderful to hear. What made today feel so good? Holding on to those moments helps on the harder days.",
            "positive_reinforcement",
        ),
        "sad" => (
            "I'm sorry you're feeling low. It's natural to miss home out here. Would it help to plan a call with someone close to you?",
            "validation",
        ),
        "anxious" => (
            "Let's slow things down together. Try breathing in for four counts, holding for four, and out for six. What's on your mind most right now?",
            "guided_breathing",
        ),
        "stressed" => (
            "That sounds like a lot to carry. Let's break it into smaller pieces. What is the one task that matters most in the next hour?",
            "cognitive_reframing",
        ),
        "angry" => (
            "It makes sense to feel frustrated. Naming what triggered it can take some of its power away. What happened?",
            "emotion_labeling",
        ),
        _ => (
            "I'm here and listening. How are you feeling about the mission today?",
            "open_inquiry",
        ),
    }
}

/// Counselor capability provider.
#[derive(Debug, Default)]
pub struct CounselorProvider;

impl CounselorProvider {
    pub fn new() -> Self {
        Self
    }

    fn chat(&self, message: &str, emotion: &str) -> Response {
        if message.trim().is_empty() {
            return Response::ok(json!({
                "agent": COUNSELOR_PROVIDER_ID,
                "response": "Take your time. I'm here whenever you want to talk.",
                "emotion": emotion,
                "technique": "open_inquiry",
                "timestamp": Timestamp::now().to_rfc3339(),
            }));
        }

        let (reply, technique) = reply_for(emotion);
        Response::ok(json!({
            "agent": COUNSELOR_PROVIDER_ID,
            "response": reply,
            "emotion": emotion,
            "technique": technique,
            "timestamp": Timestamp::now().to_rfc3339(),
        }))
    }
}

#[async_trait]
impl CapabilityProvider for CounselorProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(COUNSELOR_PROVIDER_ID, "AI Counselor", "psychological")
            .with_capabilities(&["chat"])
    }

    async fn process(&self, request: Request) -> Response {
        match request.parse::<CounselorAction>() {
            Ok(CounselorAction::Chat { message, emotion }) => self.chat(&message, &emotion),
            Err(e) => e.into(),
        }
    }
}
