//! Orchestrator - the dispatcher for meta and composite actions.
//!
//! Answers questions about the whole registry, forwards delegated tasks to
//! the provider named inside them, and fans free-form queries out to the
//! providers selected by the keyword routing table. Callers that already know
//! which provider they want use the registry directly instead.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::domain::foundation::{DispatchError, ProviderId, Timestamp};
use crate::domain::messaging::{Request, Response};
use crate::ports::{CapabilityProvider, ProviderDescriptor};

use super::registry::ProviderRegistry;
use super::routing::select_routes;
use super::stats::{ProviderState, ProviderStats, ProviderStatus};

/// Registry identity of the orchestrator itself.
pub const ORCHESTRATOR_ID: &str = "orchestrator";

/// Routing key inside a delegated task naming the target provider.
pub const TASK_PROVIDER_KEY: &str = "provider";

/// Actions understood by the orchestrator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OrchestratorAction {
    GetSystemStatus,
    GetAgentInfo {
        agent_id: String,
    },
    DelegateTask {
        task: Value,
    },
    HandleComplexQuery {
        #[serde(default)]
        query: String,
    },
}

/// Dispatcher over a read-only provider registry.
#[derive(Debug)]
pub struct Orchestrator {
    registry: Arc<ProviderRegistry>,
    descriptor: ProviderDescriptor,
    stats: ProviderStats,
}

impl Orchestrator {
    /// Create an orchestrator over an initialized registry.
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        let descriptor = ProviderDescriptor::new(ORCHESTRATOR_ID, "Orchestrator", "coordinator")
            .with_capabilities(&[
                "get_system_status",
                "get_agent_info",
                "delegate_task",
                "handle_complex_query",
            ]);

        Self {
            registry,
            descriptor,
            stats: ProviderStats::new(),
        }
    }

    /// The registry this orchestrator routes over.
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Dispatch a request, recording orchestrator statistics.
    pub async fn dispatch(&self, request: Request) -> Response {
        let started = Instant::now();

        let response = match request.parse::<OrchestratorAction>() {
            Ok(action) => self.handle(action).await,
            Err(e) => e.into(),
        };

        self.stats.record(started.elapsed(), response.is_error());
        response
    }

    async fn handle(&self, action: OrchestratorAction) -> Response {
        match action {
            OrchestratorAction::GetSystemStatus => self.system_status(),
            OrchestratorAction::GetAgentInfo { agent_id } => self
                .agent_info(&agent_id)
                .map(|status| Response::ok(json!(status)))
                .unwrap_or_else(Response::from),
            OrchestratorAction::DelegateTask { task } => self
                .delegate(task)
                .await
                .unwrap_or_else(Response::from),
            OrchestratorAction::HandleComplexQuery { query } => self.complex_query(&query).await,
        }
    }

    /// Status of the orchestrator followed by every registered provider.
    fn statuses(&self) -> Vec<ProviderStatus> {
        std::iter::once(ProviderStatus::new(self.descriptor.clone(), &self.stats))
            .chain(self.registry.iter().map(|handle| handle.status()))
            .collect()
    }

    fn system_status(&self) -> Response {
        let agents = self.statuses();
        let active = agents
            .iter()
            .filter(|a| a.state == ProviderState::Active)
            .count();

        Response::ok(json!({
            "total_agents": agents.len(),
            "active_agents": active,
            "agents": agents,
            "timestamp": Timestamp::now().to_rfc3339(),
        }))
    }

    fn agent_info(&self, agent_id: &str) -> Result<ProviderStatus, DispatchError> {
        if agent_id == ORCHESTRATOR_ID {
            return Ok(ProviderStatus::new(self.descriptor.clone(), &self.stats));
        }

        self.registry
            .get(agent_id)
            .map(|handle| handle.status())
            .ok_or_else(|| DispatchError::not_found(agent_id))
    }

    async fn delegate(&self, task: Value) -> Result<Response, DispatchError> {
        let task = Request::from_value(task)
            .map_err(|e| DispatchError::invalid_task(e.to_string()))?;

        let provider_id = task.get_str(TASK_PROVIDER_KEY).ok_or_else(|| {
            DispatchError::invalid_task(format!("task has no '{TASK_PROVIDER_KEY}' field"))
        })?;

        let handle = self
            .registry
            .get(provider_id)
            .ok_or_else(|| DispatchError::NotFound(ProviderId::new(provider_id)))?
            .clone();

        tracing::debug!(provider = %handle.id(), "Delegating task");
        Ok(handle.process(task).await)
    }

    async fn complex_query(&self, query: &str) -> Response {
        let query = query.trim();
        if query.is_empty() {
            return Response::error("Query cannot be empty");
        }

        let routes: Vec<_> = select_routes(query)
            .into_iter()
            .filter_map(|route| self.registry.get(route.provider).map(|h| (route, h.clone())))
            .collect();

        if routes.is_empty() {
            return Response::ok(json!({
                "query": query,
                "routed_to": [],
                "results": {},
                "summary": "No specialist matched the query; reporting overall system status",
                "system_status": self.system_status().into_value(),
                "timestamp": Timestamp::now().to_rfc3339(),
            }));
        }

        let replies = join_all(
            routes
                .iter()
                .map(|(route, handle)| handle.process(route.request())),
        )
        .await;

        let mut results = Map::new();
        let mut routed_to = Vec::with_capacity(routes.len());
        for ((route, _), reply) in routes.iter().zip(replies) {
            routed_to.push(route.provider);
            results.insert(route.provider.to_string(), reply.into_value());
        }

        tracing::debug!(query, routed_to = ?routed_to, "Handled complex query");

        Response::ok(json!({
            "query": query,
            "summary": format!("Consulted {} specialist(s)", routed_to.len()),
            "routed_to": routed_to,
            "results": results,
            "timestamp": Timestamp::now().to_rfc3339(),
        }))
    }
}

#[async_trait]
impl CapabilityProvider for Orchestrator {
    fn descriptor(&self) -> ProviderDescriptor {
        self.descriptor.clone()
    }

    async fn process(&self, request: Request) -> Response {
        self.dispatch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::providers::MockProvider;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn orchestrator_with(providers: Vec<MockProvider>) -> Orchestrator {
        let mut registry = ProviderRegistry::new();
        for provider in providers {
            registry.register(provider).unwrap();
        }
        Orchestrator::new(Arc::new(registry))
    }

    fn agent_ids(response: &Response) -> Vec<String> {
        response.get("agents").unwrap().as_array().unwrap()
            .iter()
            .map(|a| a["agent_id"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn system_status_lists_orchestrator_then_providers() {
        let orchestrator = orchestrator_with(vec![
            MockProvider::new("vitals_agent"),
            MockProvider::new("mood_agent"),
        ]);

        let response = orchestrator.dispatch(Request::action("get_system_status")).await;

        assert!(!response.is_error());
        assert_eq!(
            agent_ids(&response),
            vec!["orchestrator", "vitals_agent", "mood_agent"]
        );
        assert_eq!(response.get("total_agents"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn system_status_on_empty_registry_succeeds() {
        let orchestrator = orchestrator_with(vec![]);
        let response = orchestrator.dispatch(Request::action("get_system_status")).await;

        assert!(!response.is_error());
        assert_eq!(agent_ids(&response), vec!["orchestrator"]);
    }

    #[tokio::test]
    async fn agent_info_for_registered_provider() {
        let orchestrator = orchestrator_with(vec![MockProvider::new("sleep_agent")]);

        let response = orchestrator
            .dispatch(Request::action("get_agent_info").with("agent_id", "sleep_agent"))
            .await;

        assert!(!response.is_error());
        assert_eq!(response.get("agent_id"), Some(&json!("sleep_agent")));
        assert_eq!(response.get("state"), Some(&json!("idle")));
    }

    #[tokio::test]
    async fn agent_info_for_orchestrator_itself() {
        let orchestrator = orchestrator_with(vec![]);

        let response = orchestrator
            .dispatch(Request::action("get_agent_info").with("agent_id", ORCHESTRATOR_ID))
            .await;

        assert_eq!(response.get("type"), Some(&json!("coordinator")));
    }

    #[tokio::test]
    async fn agent_info_for_unknown_provider_is_error() {
        let orchestrator = orchestrator_with(vec![MockProvider::new("sleep_agent")]);

        let response = orchestrator
            .dispatch(Request::action("get_agent_info").with("agent_id", "ghost_agent"))
            .await;

        assert_eq!(response.error_message(), Some("Agent 'ghost_agent' not found"));
    }

    #[tokio::test]
    async fn delegate_task_forwards_unmodified_task() {
        let vitals = MockProvider::new("vitals_agent")
            .with_response("get_current", json!({"heart_rate": 71}));
        let orchestrator = orchestrator_with(vec![vitals.clone()]);

        let task = json!({"provider": "vitals_agent", "action": "get_current", "extra": 1});
        let response = orchestrator
            .dispatch(Request::action("delegate_task").with("task", task.clone()))
            .await;

        assert_eq!(response.into_value(), json!({"heart_rate": 71}));
        assert_eq!(vitals.calls(), vec![Request::from_value(task).unwrap()]);
    }

    #[tokio::test]
    async fn delegate_task_to_unknown_provider_keeps_dispatcher_usable() {
        let orchestrator = orchestrator_with(vec![MockProvider::new("vitals_agent")]);

        let failed = orchestrator
            .dispatch(
                Request::action("delegate_task")
                    .with("task", json!({"provider": "warp_drive", "action": "engage"})),
            )
            .await;
        let status = orchestrator.dispatch(Request::action("get_system_status")).await;

        assert_eq!(failed.error_message(), Some("Agent 'warp_drive' not found"));
        assert!(!status.is_error());
    }

    #[tokio::test]
    async fn delegate_task_without_routing_key_is_error() {
        let orchestrator = orchestrator_with(vec![MockProvider::new("vitals_agent")]);

        let response = orchestrator
            .dispatch(Request::action("delegate_task").with("task", json!({"action": "get_current"})))
            .await;

        assert!(response.error_message().unwrap().contains("provider"));
    }

    #[tokio::test]
    async fn delegate_non_object_task_is_error() {
        let orchestrator = orchestrator_with(vec![]);

        let response = orchestrator
            .dispatch(Request::action("delegate_task").with("task", "get_current"))
            .await;

        assert!(response.is_error());
    }

    #[tokio::test]
    async fn complex_query_consults_matched_providers() {
        let sleep = MockProvider::new("sleep_agent")
            .with_response("analyze_sleep", json!({"quality": 82}));
        let mood = MockProvider::new("mood_agent")
            .with_response("get_mood_trend", json!({"trend": "stable"}));
        let vitals = MockProvider::new("vitals_agent");
        let orchestrator = orchestrator_with(vec![sleep.clone(), mood.clone(), vitals.clone()]);

        let response = orchestrator
            .dispatch(Request::action("handle_complex_query").with("query", "I feel tired"))
            .await;

        assert_eq!(
            response.get("routed_to"),
            Some(&json!(["sleep_agent", "mood_agent"]))
        );
        assert_eq!(response.get("results").unwrap()["sleep_agent"]["quality"], 82);
        assert_eq!(sleep.call_count(), 1);
        assert_eq!(mood.call_count(), 1);
        assert_eq!(vitals.call_count(), 0);
    }

    #[tokio::test]
    async fn complex_query_skips_unregistered_routes() {
        let orchestrator = orchestrator_with(vec![]);

        let response = orchestrator
            .dispatch(Request::action("handle_complex_query").with("query", "sleep report"))
            .await;

        assert_eq!(response.get("routed_to"), Some(&json!([])));
        assert!(response.get("system_status").is_some());
    }

    #[tokio::test]
    async fn complex_query_empty_is_error() {
        let orchestrator = orchestrator_with(vec![]);

        let response = orchestrator
            .dispatch(Request::action("handle_complex_query"))
            .await;

        assert!(response.is_error());
    }

    #[tokio::test]
    async fn unknown_action_is_error() {
        let orchestrator = orchestrator_with(vec![]);
        let response = orchestrator.dispatch(Request::action("reboot")).await;

        assert!(response.error_message().unwrap().contains("reboot"));
    }

    #[tokio::test]
    async fn dispatch_updates_own_metrics() {
        let orchestrator = orchestrator_with(vec![]);
        orchestrator.dispatch(Request::action("get_system_status")).await;

        let response = orchestrator
            .dispatch(Request::action("get_agent_info").with("agent_id", ORCHESTRATOR_ID))
            .await;

        assert_eq!(response.get("state"), Some(&json!("active")));
    }

    proptest! {
        #[test]
        fn system_status_has_one_entry_per_provider(
            ids in proptest::collection::hash_set("[a-z]{1,8}_agent", 0..12)
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let orchestrator = orchestrator_with(ids.iter().map(|id| MockProvider::new(id.as_str())).collect());

            let response = runtime.block_on(orchestrator.dispatch(Request::action("get_system_status")));
            let listed = agent_ids(&response);
            let unique: HashSet<&String> = listed.iter().collect();

            prop_assert!(!response.is_error());
            prop_assert_eq!(listed.len(), ids.len() + 1);
            prop_assert_eq!(unique.len(), listed.len());
            for id in &ids {
                prop_assert!(listed.contains(id));
            }
        }

        #[test]
        fn agent_info_errors_iff_unregistered(
            ids in proptest::collection::hash_set("[a-z]{1,6}_agent", 1..6),
            probe in "[a-z]{1,6}_agent"
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let orchestrator = orchestrator_with(ids.iter().map(|id| MockProvider::new(id.as_str())).collect());

            let response = runtime.block_on(orchestrator.dispatch(
                Request::action("get_agent_info").with("agent_id", probe.clone()),
            ));

            prop_assert_eq!(response.is_error(), !ids.contains(&probe));
        }
    }
}
