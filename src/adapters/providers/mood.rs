//! Mood provider - keyword-based emotion inference and trend tracking.

use std::collections::{BTreeMap, VecDeque};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

use crate::domain::foundation::Timestamp;
use crate::domain::messaging::{Request, Response};
use crate::ports::{CapabilityProvider, ProviderDescriptor};

pub const MOOD_PROVIDER_ID: &str = "mood_agent";

/// Emotion reported when no keyword matches.
pub const NEUTRAL: &str = "neutral";

const HISTORY_LIMIT: usize = 50;

const LEXICON: &[(&str, &[&str])] = &[
    ("happy", &["great", "happy", "good", "excited", "wonderful", "glad", "amazing"]),
    ("sad", &["sad", "down", "lonely", "miss", "depressed", "homesick"]),
    ("anxious", &["anxious", "worried", "nervous", "scared", "afraid", "panic"]),
    ("stressed", &["stress", "overwhelmed", "pressure", "exhausted", "burnout"]),
    ("angry", &["angry", "frustrated", "annoyed", "furious", "irritated"]),
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum MoodAction {
    AnalyzeMood {
        #[serde(default)]
        text: String,
    },
    GetMoodTrend,
}

/// Result of analysing one message.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodAnalysis {
    pub emotion: &'static str,
    pub confidence: f64,
    pub keywords: Vec<&'static str>,
}

/// Infer the dominant emotion of a message.
///
/// The emotion with the most keyword hits wins; ties go to the earlier
/// lexicon entry.
pub fn infer(text: &str) -> MoodAnalysis {
    let normalized = text.to_lowercase();

    let best = LEXICON
        .iter()
        .map(|(emotion, words)| {
            let hits: Vec<&'static str> = words
                .iter()
                .copied()
                .filter(|w| normalized.contains(w))
                .collect();
            (*emotion, hits)
        })
        .filter(|(_, hits)| !hits.is_empty())
        .fold(None::<(&'static str, Vec<&'static str>)>, |best, candidate| match best {
            Some(b) if b.1.len() >= candidate.1.len() => Some(b),
            _ => Some(candidate),
        });

    match best {
        Some((emotion, keywords)) => MoodAnalysis {
            emotion,
            confidence: (0.55 + 0.15 * keywords.len() as f64).min(0.95),
            keywords,
        },
        None => MoodAnalysis {
            emotion: NEUTRAL,
            confidence: 0.5,
            keywords: Vec::new(),
        },
    }
}

/// Mood capability provider.
#[derive(Debug, Default)]
pub struct MoodProvider {
    history: Mutex<VecDeque<&'static str>>,
}

impl MoodProvider {
    pub fn new() -> Self {
        Self::default()
    }

    async fn analyze(&self, text: &str) -> Response {
        let analysis = infer(text);

        let mut history = self.history.lock().await;
        history.push_back(analysis.emotion);
        if history.len() > HISTORY_LIMIT {
            history.pop_front();
        }

        Response::ok(json!({
            "agent": MOOD_PROVIDER_ID,
            "mood_analysis": {
                "emotion": analysis.emotion,
                "confidence": analysis.confidence,
                "keywords": analysis.keywords,
            },
            "timestamp": Timestamp::now().to_rfc3339(),
        }))
    }

    async fn trend(&self) -> Response {
        let history = self.history.lock().await;

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for emotion in history.iter().copied() {
            *counts.entry(emotion).or_default() += 1;
        }
        let dominant = counts
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(emotion, _)| *emotion)
            .unwrap_or(NEUTRAL);

        Response::ok(json!({
            "agent": MOOD_PROVIDER_ID,
            "trend": {
                "dominant_emotion": dominant,
                "samples": history.len(),
                "counts": counts,
                "recent": history.iter().rev().take(5).collect::<Vec<_>>(),
            },
            "timestamp": Timestamp::now().to_rfc3339(),
        }))
    }
}

#[async_trait]
impl CapabilityProvider for MoodProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(MOOD_PROVIDER_ID, "Mood Analyzer", "psychological")
            .with_capabilities(&["analyze_mood", "get_mood_trend"])
    }

    async fn process(&self, request: Request) -> Response {
        match request.parse::<MoodAction>() {
            Ok(MoodAction::AnalyzeMood { text }) => self.analyze(&text).await,
            Ok(MoodAction::GetMoodTrend) => self.trend().await,
            Err(e) => e.into(),
        }
    }
}
