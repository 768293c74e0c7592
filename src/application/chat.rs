//! Chat flow: infer the emotion of a message, then ask the counselor.

use crate::adapters::providers::{COUNSELOR_PROVIDER_ID, MOOD_PROVIDER_ID};
use crate::domain::messaging::{Request, Response};
use crate::domain::orchestration::ProviderRegistry;

/// Emotion used whenever the mood provider cannot supply one.
pub const DEFAULT_EMOTION: &str = "neutral";

/// Ask the mood provider for the emotion of `text`.
///
/// Falls back to [`DEFAULT_EMOTION`] when the provider is missing, answers
/// with an error, or omits `mood_analysis.emotion`.
pub async fn infer_emotion(registry: &ProviderRegistry, text: &str) -> String {
    let Some(mood) = registry.get(MOOD_PROVIDER_ID) else {
        return DEFAULT_EMOTION.to_string();
    };

    let response = mood
        .process(Request::action("analyze_mood").with("text", text))
        .await;

    response
        .get("mood_analysis")
        .and_then(|analysis| analysis.get("emotion"))
        .and_then(|emotion| emotion.as_str())
        .filter(|emotion| !emotion.is_empty())
        .unwrap_or(DEFAULT_EMOTION)
        .to_string()
}

/// Produce the counselor's reply to `text`.
///
/// Returns `None` when no counselor is registered.
pub async fn converse(registry: &ProviderRegistry, text: &str) -> Option<Response> {
    let counselor = registry.get(COUNSELOR_PROVIDER_ID)?;
    let emotion = infer_emotion(registry, text).await;

    tracing::debug!(emotion = %emotion, "Forwarding chat to counselor");

    let request = Request::action("chat")
        .with("message", text)
        .with("emotion", emotion);
    Some(counselor.process(request).await)
}
