//! Integration tests for the REST API.
//!
//! These tests drive the full router (middleware included) in-process:
//! 1. Provider shims return the provider's response body
//! 2. Missing providers and orchestrator map to the documented status codes
//! 3. Task delegation and agent lookup go through the orchestrator

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use maitri::adapters::http::build_router;
use maitri::adapters::providers::{MockProvider, VITALS_PROVIDER_ID};
use maitri::application::AppContext;
use maitri::config::{ServerConfig, StreamingConfig};
use maitri::domain::orchestration::ProviderRegistry;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn full_app() -> Router {
    let ctx = AppContext::with_default_providers(StreamingConfig::default()).unwrap();
    build_router(ctx, &ServerConfig::default())
}

fn app_with(registry: ProviderRegistry, orchestrator: bool) -> Router {
    let registry = Arc::new(registry);
    let ctx = if orchestrator {
        AppContext::new(registry, StreamingConfig::default())
    } else {
        AppContext::without_orchestrator(registry, StreamingConfig::default())
    };
    build_router(ctx, &ServerConfig::default())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// =============================================================================
// System endpoints
// =============================================================================

#[tokio::test]
async fn root_reports_provider_count() {
    let (status, body) = get(full_app(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "MAITRI Backend is running");
    assert_eq!(body["agents_count"], 10);
}

#[tokio::test]
async fn root_count_matches_system_status_total() {
    let (_, root) = get(full_app(), "/").await;
    let (_, agents) = get(full_app(), "/api/agents").await;
    assert_eq!(root["agents_count"], agents["total_agents"]);

    let mut registry = ProviderRegistry::new();
    registry.register(MockProvider::new("sleep_agent")).unwrap();
    let (_, root) = get(app_with(registry, false), "/").await;
    assert_eq!(root["agents_count"], 1);
}

#[tokio::test]
async fn agents_lists_orchestrator_then_providers() {
    let (status, body) = get(full_app(), "/api/agents").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_agents"], 10);
    let agents = body["agents"].as_array().unwrap();
    assert_eq!(agents[0]["agent_id"], "orchestrator");
    assert_eq!(agents[1]["agent_id"], VITALS_PROVIDER_ID);
}

#[tokio::test]
async fn agents_without_orchestrator_is_initializing() {
    let (status, body) = get(app_with(ProviderRegistry::new(), false), "/api/agents").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"agents": [], "message": "System initializing"}));
}

#[tokio::test]
async fn agent_lookup_found_and_missing() {
    let (status, body) = get(full_app(), "/api/agent/sleep_agent").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agent_id"], "sleep_agent");

    let (status, body) = get(full_app(), "/api/agent/weather_agent").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Agent 'weather_agent' not found");
}

#[tokio::test]
async fn agent_lookup_without_orchestrator_is_503() {
    let (status, _) = get(app_with(ProviderRegistry::new(), false), "/api/agent/x").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn task_delegation_forwards_to_named_provider() {
    let vitals = MockProvider::new(VITALS_PROVIDER_ID)
        .with_response("get_current", json!({"vitals": {"heart_rate": 64}}));
    let mut registry = ProviderRegistry::new();
    registry.register(vitals.clone()).unwrap();

    let (status, body) = post(
        app_with(registry, true),
        "/api/task",
        json!({"provider": VITALS_PROVIDER_ID, "action": "get_current"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vitals"]["heart_rate"], 64);
    assert_eq!(vitals.calls()[0].get_str("provider"), Some(VITALS_PROVIDER_ID));
}

#[tokio::test]
async fn task_for_unknown_provider_passes_error_through() {
    let (status, body) = post(
        full_app(),
        "/api/task",
        json!({"provider": "weather_agent", "action": "forecast"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_string());
}

// =============================================================================
// Provider shims
// =============================================================================

#[tokio::test]
async fn every_shim_answers_with_default_providers() {
    for uri in [
        "/api/vitals",
        "/api/alerts",
        "/api/workout",
        "/api/workout?focus=cardio",
        "/api/sleep",
        "/api/meal-plan",
        "/api/mood",
        "/api/social",
        "/api/prediction",
    ] {
        let (status, body) = get(full_app(), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body.get("error").is_none(), "{uri}: {body}");
    }
}

#[tokio::test]
async fn shims_without_provider_are_503() {
    for uri in ["/api/vitals", "/api/alerts", "/api/sleep", "/api/prediction"] {
        let (status, body) = get(app_with(ProviderRegistry::new(), true), uri).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        assert_eq!(body["message"], "System initializing");
    }
}

#[tokio::test]
async fn prediction_out_of_range_passes_error_through() {
    let (status, body) = get(full_app(), "/api/prediction?hours=500").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn vitals_history_is_empty_placeholder() {
    let (status, body) = get(full_app(), "/api/vitals/history?hours=6").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hours"], 6);
    assert_eq!(body["history"], json!([]));
}

#[tokio::test]
async fn chat_goes_through_mood_and_counselor() {
    let (status, body) = post(full_app(), "/api/chat", json!({"text": "I feel anxious"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emotion"], "anxious");
    assert!(body["response"].is_string());
}

#[tokio::test]
async fn chat_without_counselor_is_503() {
    let (status, _) = post(
        app_with(ProviderRegistry::new(), true),
        "/api/chat",
        json!({"text": "hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn cors_preflight_is_permissive_by_default() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/vitals")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();

    let response = full_app().oneshot(request).await.unwrap();

    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn configured_origins_restrict_preflight() {
    let config = ServerConfig {
        cors_origins: Some("http://localhost:5173".to_string()),
        ..Default::default()
    };
    let ctx = AppContext::with_default_providers(StreamingConfig::default()).unwrap();
    let app = build_router(ctx, &config);

    let preflight = |origin: &'static str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/vitals")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap()
    };

    let allowed = app
        .clone()
        .oneshot(preflight("http://localhost:5173"))
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );

    let denied = app.oneshot(preflight("http://evil.example")).await.unwrap();
    assert!(!denied
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
