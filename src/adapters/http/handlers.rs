//! HTTP handlers for the REST API.
//!
//! Most endpoints are thin shims over one provider: look it up, send one
//! request, return its response body as-is. A missing provider is a 503.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{json, Value};

use crate::adapters::providers::{
    ALERT_PROVIDER_ID, DIGITAL_TWIN_PROVIDER_ID, EXERCISE_PROVIDER_ID, MOOD_PROVIDER_ID,
    NUTRITION_PROVIDER_ID, SLEEP_PROVIDER_ID, SOCIAL_PROVIDER_ID, VITALS_PROVIDER_ID,
};
use crate::application::{chat, AppContext};
use crate::domain::foundation::Timestamp;
use crate::domain::messaging::{Request, Response};

use super::dto::{ChatRequest, ErrorResponse, HoursParams, ServiceInfo, WorkoutParams};

const INITIALIZING: &str = "System initializing";

// ════════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════════

/// API error that implements IntoResponse.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The provider (or orchestrator) needed for the endpoint is not registered.
    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, ErrorResponse::unavailable(msg))
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::not_found(msg)),
        };
        (status, Json(error)).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiError>;

/// Send one request to a provider by identity.
async fn call_provider(ctx: &AppContext, provider: &str, request: Request) -> ApiResult {
    let handle = ctx.registry.get(provider).ok_or_else(|| {
        tracing::warn!(provider, "Request for unregistered provider");
        ApiError::Unavailable(INITIALIZING.to_string())
    })?;
    Ok(Json(handle.process(request).await.into_value()))
}

async fn call_orchestrator(ctx: &AppContext, request: Request) -> Result<Response, ApiError> {
    let orchestrator = ctx
        .orchestrator
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable(INITIALIZING.to_string()))?;
    Ok(orchestrator.dispatch(request).await)
}

// ════════════════════════════════════════════════════════════════════════════════
// System
// ════════════════════════════════════════════════════════════════════════════════

/// GET /
pub async fn service_info(State(ctx): State<AppContext>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "MAITRI Backend is running",
        version: env!("CARGO_PKG_VERSION"),
        agents_count: ctx.registry.len() + usize::from(ctx.orchestrator.is_some()),
    })
}

/// GET /api/agents
pub async fn list_agents(State(ctx): State<AppContext>) -> Json<Value> {
    match call_orchestrator(&ctx, Request::action("get_system_status")).await {
        Ok(response) => Json(response.into_value()),
        Err(_) => Json(json!({"agents": [], "message": INITIALIZING})),
    }
}

/// GET /api/agent/:agent_id
pub async fn get_agent(
    State(ctx): State<AppContext>,
    Path(agent_id): Path<String>,
) -> ApiResult {
    let request = Request::action("get_agent_info").with("agent_id", agent_id);
    let response = call_orchestrator(&ctx, request).await?;

    match response.error_message() {
        Some(message) => Err(ApiError::NotFound(message.to_string())),
        None => Ok(Json(response.into_value())),
    }
}

/// POST /api/task
pub async fn create_task(State(ctx): State<AppContext>, Json(task): Json<Value>) -> ApiResult {
    let request = Request::action("delegate_task").with("task", task);
    let response = call_orchestrator(&ctx, request).await?;
    Ok(Json(response.into_value()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Provider shims
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/vitals
pub async fn current_vitals(State(ctx): State<AppContext>) -> ApiResult {
    call_provider(&ctx, VITALS_PROVIDER_ID, Request::action("get_current")).await
}

/// GET /api/vitals/history
///
/// Readings are not persisted, so the history is always empty.
pub async fn vitals_history(Query(params): Query<HoursParams>) -> Json<Value> {
    Json(json!({
        "agent": VITALS_PROVIDER_ID,
        "hours": params.hours,
        "history": [],
        "note": "Vitals history is not retained",
        "timestamp": Timestamp::now().to_rfc3339(),
    }))
}

/// GET /api/alerts
pub async fn active_alerts(State(ctx): State<AppContext>) -> ApiResult {
    let request = Request::action("get_alerts").with("status", "active");
    call_provider(&ctx, ALERT_PROVIDER_ID, request).await
}

/// POST /api/chat
pub async fn chat_message(
    State(ctx): State<AppContext>,
    Json(body): Json<ChatRequest>,
) -> ApiResult {
    match chat::converse(&ctx.registry, &body.text).await {
        Some(response) => Ok(Json(response.into_value())),
        None => Err(ApiError::Unavailable(INITIALIZING.to_string())),
    }
}

/// GET /api/workout
pub async fn workout(
    State(ctx): State<AppContext>,
    Query(params): Query<WorkoutParams>,
) -> ApiResult {
    let request = Request::action("generate_workout").with("focus", params.focus);
    call_provider(&ctx, EXERCISE_PROVIDER_ID, request).await
}

/// GET /api/sleep
pub async fn sleep_analysis(State(ctx): State<AppContext>) -> ApiResult {
    call_provider(&ctx, SLEEP_PROVIDER_ID, Request::action("analyze_sleep")).await
}

/// GET /api/meal-plan
pub async fn meal_plan(State(ctx): State<AppContext>) -> ApiResult {
    call_provider(&ctx, NUTRITION_PROVIDER_ID, Request::action("generate_meal_plan")).await
}

/// GET /api/mood
pub async fn mood_trend(State(ctx): State<AppContext>) -> ApiResult {
    call_provider(&ctx, MOOD_PROVIDER_ID, Request::action("get_mood_trend")).await
}

/// GET /api/social
pub async fn morale(State(ctx): State<AppContext>) -> ApiResult {
    call_provider(&ctx, SOCIAL_PROVIDER_ID, Request::action("get_morale")).await
}

/// GET /api/prediction
pub async fn prediction(
    State(ctx): State<AppContext>,
    Query(params): Query<HoursParams>,
) -> ApiResult {
    let request = Request::action("predict_health").with("hours", params.hours);
    call_provider(&ctx, DIGITAL_TWIN_PROVIDER_ID, request).await
}
