//! Per-connection session loop.
//!
//! Runs for the lifetime of one client:
//! 1. Register the session and subscribe it to every topic
//! 2. Send the `connected` acknowledgement
//! 3. Start the vitals and status producers in the session scope
//! 4. Answer inbound commands until the transport closes
//! 5. Disconnect, which stops the producers before the id is released

use axum::extract::ws::Message;
use futures::Stream;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use crate::adapters::providers::VITALS_PROVIDER_ID;
use crate::application::{chat, AppContext};
use crate::domain::foundation::{ClientId, DispatchError};
use crate::domain::messaging::{Request, Response};
use crate::domain::orchestration::ORCHESTRATOR_ID;

use super::messages::{ClientMessage, ServerMessage};
use super::topics::Topic;

/// Drive one session to completion and return its id.
///
/// `outbound` feeds the session's single writer; `inbound` yields the raw
/// frames read from the transport.
pub async fn run_session<S>(
    ctx: AppContext,
    outbound: mpsc::Sender<ServerMessage>,
    mut inbound: S,
) -> ClientId
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let connections = ctx.connections.clone();
    let id = connections.connect(outbound).await;

    for topic in Topic::ALL {
        connections.subscribe(id, topic).await;
    }
    connections
        .send_personal(ServerMessage::connected(id), id)
        .await;

    if ctx.registry.contains(VITALS_PROVIDER_ID) {
        connections
            .spawn_producer(id, push_vitals(ctx.clone(), id))
            .await;
    }
    if ctx.orchestrator.is_some() {
        connections
            .spawn_producer(id, push_status(ctx.clone(), id))
            .await;
    }

    while let Some(message) = connections.receive(id, &mut inbound).await {
        handle_message(&ctx, id, message).await;
    }

    connections.disconnect(id).await;
    id
}

async fn handle_message(ctx: &AppContext, id: ClientId, message: ClientMessage) {
    let reply = match message {
        ClientMessage::Chat { text } => match chat::converse(&ctx.registry, &text).await {
            Some(response) => ServerMessage::chat_response(response.into_value()),
            None => {
                tracing::debug!(client_id = %id, "No counselor registered, chat ignored");
                return;
            }
        },
        ClientMessage::Command { query } => {
            let response: Response = match &ctx.orchestrator {
                Some(orchestrator) => {
                    let request = Request::action("handle_complex_query").with("query", query);
                    orchestrator.dispatch(request).await
                }
                None => DispatchError::Unavailable(ORCHESTRATOR_ID.to_string()).into(),
            };
            ServerMessage::command_response(response.into_value())
        }
        ClientMessage::Ping => ServerMessage::pong(),
    };

    ctx.connections.send_personal(reply, id).await;
}

/// Push a vitals reading every `vitals_interval`, starting immediately.
async fn push_vitals(ctx: AppContext, id: ClientId) {
    let Some(vitals) = ctx.registry.get(VITALS_PROVIDER_ID).cloned() else {
        return;
    };
    let mut ticker = interval(ctx.streaming.vitals_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let response = vitals.process(Request::action("get_current")).await;
        let message = ServerMessage::vitals_update(response.into_value());
        if !ctx.connections.send_personal(message, id).await {
            break;
        }
    }
}

/// Push the system status every `status_interval`, starting immediately.
async fn push_status(ctx: AppContext, id: ClientId) {
    let Some(orchestrator) = ctx.orchestrator.clone() else {
        return;
    };
    let mut ticker = interval(ctx.streaming.status_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let response = orchestrator
            .dispatch(Request::action("get_system_status"))
            .await;
        let message = ServerMessage::agent_status(response.into_value());
        if !ctx.connections.send_personal(message, id).await {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::providers::{
        MockProvider, COUNSELOR_PROVIDER_ID, MOOD_PROVIDER_ID,
    };
    use crate::config::StreamingConfig;
    use crate::domain::orchestration::ProviderRegistry;
    use futures::channel::mpsc::{unbounded, UnboundedSender};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    type Inbound = UnboundedSender<Result<Message, axum::Error>>;

    fn fast_streaming() -> StreamingConfig {
        StreamingConfig {
            vitals_interval_ms: 20,
            status_interval_ms: 50,
            outbound_buffer: 64,
        }
    }

    fn vitals_mock() -> MockProvider {
        MockProvider::new(VITALS_PROVIDER_ID)
            .with_response("get_current", json!({"vitals": {"heart_rate": 70}}))
    }

    fn start(
        registry: ProviderRegistry,
    ) -> (
        AppContext,
        Inbound,
        mpsc::Receiver<ServerMessage>,
        tokio::task::JoinHandle<ClientId>,
    ) {
        let ctx = AppContext::new(Arc::new(registry), fast_streaming());
        let (out_tx, out_rx) = mpsc::channel(64);
        let (in_tx, in_rx) = unbounded();
        let session = tokio::spawn(run_session(ctx.clone(), out_tx, in_rx));
        (ctx, in_tx, out_rx, session)
    }

    fn send(inbound: &Inbound, body: serde_json::Value) {
        inbound
            .unbounded_send(Ok(Message::Text(body.to_string())))
            .unwrap();
    }

    /// Read until a message of `kind` arrives, discarding others.
    async fn next_of(rx: &mut mpsc::Receiver<ServerMessage>, kind: &str) -> ServerMessage {
        timeout(Duration::from_secs(2), async {
            loop {
                let message = rx.recv().await.expect("outbound closed");
                if message.kind() == kind {
                    return message;
                }
            }
        })
        .await
        .expect("timed out waiting for message")
    }

    #[tokio::test]
    async fn connect_then_periodic_updates() {
        let mut registry = ProviderRegistry::new();
        registry.register(vitals_mock()).unwrap();
        let (_ctx, _inbound, mut rx, _session) = start(registry);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind(), "connected");

        next_of(&mut rx, "vitals_update").await;
        next_of(&mut rx, "agent_status").await;
    }

    #[tokio::test]
    async fn ping_gets_pong() {
        let (_ctx, inbound, mut rx, _session) = start(ProviderRegistry::new());

        send(&inbound, json!({"type": "ping"}));

        next_of(&mut rx, "pong").await;
    }

    #[tokio::test]
    async fn chat_uses_inferred_emotion() {
        let counselor = Arc::new(
            MockProvider::new(COUNSELOR_PROVIDER_ID)
                .with_response("chat", json!({"response": "Glad to hear it"})),
        );
        let mut registry = ProviderRegistry::new();
        registry
            .register(
                MockProvider::new(MOOD_PROVIDER_ID).with_response(
                    "analyze_mood",
                    json!({"mood_analysis": {"emotion": "happy"}}),
                ),
            )
            .unwrap();
        registry.register_shared(counselor.clone()).unwrap();
        let (_ctx, inbound, mut rx, _session) = start(registry);

        send(&inbound, json!({"type": "chat", "text": "I feel great today"}));

        let reply = next_of(&mut rx, "chat_response").await;
        let ServerMessage::ChatResponse(update) = reply else {
            panic!("expected chat response");
        };
        assert_eq!(update.data["response"], "Glad to hear it");

        let calls = counselor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].get_str("message"), Some("I feel great today"));
        assert_eq!(calls[0].get_str("emotion"), Some("happy"));
    }

    #[tokio::test]
    async fn chat_without_counselor_sends_nothing() {
        let (_ctx, inbound, mut rx, _session) = start(ProviderRegistry::new());

        send(&inbound, json!({"text": "hello"}));
        send(&inbound, json!({"type": "ping"}));

        // The pong is the next thing after whatever status updates arrive
        loop {
            let message = timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
            assert_ne!(message.kind(), "chat_response");
            if message.kind() == "pong" {
                break;
            }
        }
    }

    #[tokio::test]
    async fn command_goes_through_orchestrator() {
        let mut registry = ProviderRegistry::new();
        registry.register(vitals_mock()).unwrap();
        let (_ctx, inbound, mut rx, _session) = start(registry);

        send(&inbound, json!({"type": "command", "query": "check my heart rate"}));

        let ServerMessage::CommandResponse(update) = next_of(&mut rx, "command_response").await
        else {
            panic!("expected command response");
        };
        assert_eq!(update.data["routed_to"], json!(["vitals_agent"]));
    }

    #[tokio::test]
    async fn closing_transport_disconnects_and_stops_producers() {
        let mut registry = ProviderRegistry::new();
        registry.register(vitals_mock()).unwrap();
        let (ctx, inbound, mut rx, session) = start(registry);
        next_of(&mut rx, "vitals_update").await;

        drop(inbound);
        let id = timeout(Duration::from_secs(2), session).await.unwrap().unwrap();

        assert!(!ctx.connections.is_connected(id).await);
        // Session removed, so its outbound sender is gone and nothing more arrives
        while rx.recv().await.is_some() {}
    }
}
