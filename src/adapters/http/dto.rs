//! Request and response bodies for the REST API.

use serde::{Deserialize, Serialize};

/// Standard error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: "SERVICE_UNAVAILABLE".to_string(),
            message: message.into(),
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub text: String,
}

/// Query of `GET /api/workout`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutParams {
    pub focus: Option<String>,
}

/// Query of `GET /api/prediction` and `GET /api/vitals/history`.
#[derive(Debug, Clone, Deserialize)]
pub struct HoursParams {
    #[serde(default = "default_hours")]
    pub hours: u32,
}

impl Default for HoursParams {
    fn default() -> Self {
        Self {
            hours: default_hours(),
        }
    }
}

fn default_hours() -> u32 {
    24
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub agents_count: usize,
}
