//! Keyword routing for free-form queries.
//!
//! A complex query is matched against a fixed table of keyword groups; each
//! group names the provider to consult and the request to send it. A query may
//! match several groups, in which case every matched provider is consulted.
//!
//! Keywords match whole words of the query, allowing a short inflection
//! (`sleeping`, `meals`, `stressed`). Substrings inside unrelated words
//! (`great`, `interest`, `heartfelt`) do not match.

use crate::domain::messaging::Request;

/// One row of the routing table.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub provider: &'static str,
    pub action: &'static str,
    pub keywords: &'static [&'static str],
}

/// Routing table, in the order results are reported.
pub const ROUTES: &[Route] = &[
    Route {
        provider: "vitals_agent",
        action: "get_current",
        keywords: &["vital", "heart", "pulse", "oxygen", "o2", "blood", "temperature", "stress"],
    },
    Route {
        provider: "sleep_agent",
        action: "analyze_sleep",
        keywords: &["sleep", "rest", "tired", "fatigue", "insomnia"],
    },
    Route {
        provider: "exercise_agent",
        action: "generate_workout",
        keywords: &["exercise", "workout", "training", "muscle", "bone"],
    },
    Route {
        provider: "nutrition_agent",
        action: "generate_meal_plan",
        keywords: &["meal", "food", "nutrition", "diet", "eat", "calorie"],
    },
    Route {
        provider: "mood_agent",
        action: "get_mood_trend",
        keywords: &["mood", "feel", "emotion", "anxious", "sad", "happy"],
    },
    Route {
        provider: "social_agent",
        action: "get_morale",
        keywords: &["crew", "team", "morale", "social", "lonely", "family"],
    },
    Route {
        provider: "digital_twin",
        action: "predict_health",
        keywords: &["predict", "forecast", "future", "trend", "risk"],
    },
    Route {
        provider: "alert_agent",
        action: "get_alerts",
        keywords: &["alert", "alarm", "warning", "emergency"],
    },
];

/// Endings accepted after a keyword stem.
const INFLECTIONS: &[&str] = &[
    "s", "es", "ed", "ing", "y", "ly", "al", "ness", "less", "ful", "ion", "ions",
];

/// Check whether a lowercased word is the keyword or an inflection of it.
fn word_matches(word: &str, keyword: &str) -> bool {
    if let Some(rest) = word.strip_prefix(keyword) {
        return rest.is_empty() || INFLECTIONS.contains(&rest);
    }
    // exercise -> exercising, exercised
    keyword
        .strip_suffix('e')
        .and_then(|stem| word.strip_prefix(stem))
        .is_some_and(|rest| rest == "ing" || rest == "ed")
}

/// Split a query into lowercased words.
fn words(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl Route {
    /// Check whether any keyword matches one of the query's words.
    pub fn matches(&self, words: &[String]) -> bool {
        self.keywords
            .iter()
            .any(|k| words.iter().any(|w| word_matches(w, k)))
    }

    /// Request to send to the provider for this route.
    pub fn request(&self) -> Request {
        Request::action(self.action)
    }
}

/// Select the routes matching a query, in table order.
pub fn select_routes(query: &str) -> Vec<&'static Route> {
    let words = words(query);
    ROUTES.iter().filter(|r| r.matches(&words)).collect()
}
