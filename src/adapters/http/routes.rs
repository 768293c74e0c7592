//! HTTP routes for the REST API and the streaming endpoint.

use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::ws_handler;
use crate::application::AppContext;
use crate::config::{CorsPolicy, ServerConfig};

use super::handlers::{
    active_alerts, chat_message, create_task, current_vitals, get_agent, list_agents, meal_plan,
    mood_trend, morale, prediction, service_info, sleep_analysis, vitals_history, workout,
};

/// Creates the application router with all routes.
pub fn build_router(ctx: AppContext, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(service_info))
        // System
        .route("/api/agents", get(list_agents))
        .route("/api/agent/:agent_id", get(get_agent))
        .route("/api/task", post(create_task))
        // Provider shims
        .route("/api/vitals", get(current_vitals))
        .route("/api/vitals/history", get(vitals_history))
        .route("/api/alerts", get(active_alerts))
        .route("/api/chat", post(chat_message))
        .route("/api/workout", get(workout))
        .route("/api/sleep", get(sleep_analysis))
        .route("/api/meal-plan", get(meal_plan))
        .route("/api/mood", get(mood_trend))
        .route("/api/social", get(morale))
        .route("/api/prediction", get(prediction))
        // Streaming
        .route("/ws", get(ws_handler))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Permissive CORS unless explicit origins are configured.
///
/// An origin list that fails validation allows no cross-origin callers.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    match config.cors_policy() {
        Ok(CorsPolicy::AnyOrigin) => CorsLayer::permissive(),
        Ok(CorsPolicy::Origins(origins)) => CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(err) => {
            tracing::warn!(error = %err, "Rejecting cross-origin requests");
            CorsLayer::new()
        }
    }
}
