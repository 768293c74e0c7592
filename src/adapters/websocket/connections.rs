//! Connection management for streaming sessions.
//!
//! Each accepted socket becomes a session holding:
//! - the sending half of its outbound queue (drained by a single writer task)
//! - its topic subscriptions
//! - a cancellation scope owning every periodic producer spawned for it
//!
//! # Teardown
//!
//! ```text
//! disconnect(id)
//!   ├── mark closing      (sends start being dropped)
//!   ├── cancel scope      (producers stop at their next await point)
//!   ├── join producers
//!   └── remove session    (outbound sender dropped, writer drains and exits)
//! ```
//!
//! No lock on the session table is held across an outbound send or a join.

use std::collections::{HashMap, HashSet};
use std::future::Future;

use axum::extract::ws::Message;
use futures::{Stream, StreamExt};
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::domain::foundation::ClientId;

use super::messages::{ClientMessage, ServerMessage};
use super::topics::Topic;

struct ClientSession {
    outbound: mpsc::Sender<ServerMessage>,
    topics: HashSet<Topic>,
    scope: CancellationToken,
    producers: Vec<JoinHandle<()>>,
    closing: bool,
}

/// Registry of live streaming sessions.
///
/// # Thread Safety
///
/// The session table sits behind a `RwLock`; broadcasts and personal sends
/// take the read side and only clone what they need before releasing it.
pub struct ConnectionManager {
    sessions: RwLock<HashMap<ClientId, ClientSession>>,

    /// Parent of every session scope; cancelling it stops all producers.
    shutdown: CancellationToken,
}

impl ConnectionManager {
    /// Create a manager whose session scopes descend from `shutdown`.
    pub fn new(shutdown: CancellationToken) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            shutdown,
        }
    }

    /// Register a session around the outbound half of an accepted transport.
    pub async fn connect(&self, outbound: mpsc::Sender<ServerMessage>) -> ClientId {
        let id = ClientId::new();
        let session = ClientSession {
            outbound,
            topics: HashSet::new(),
            scope: self.shutdown.child_token(),
            producers: Vec::new(),
            closing: false,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(id, session);
        tracing::info!(client_id = %id, total = sessions.len(), "Client connected");
        id
    }

    /// Subscribe a session to a topic.
    ///
    /// Returns `true` if the subscription is new. Unknown sessions are ignored.
    pub async fn subscribe(&self, id: ClientId, topic: Topic) -> bool {
        match self.sessions.write().await.get_mut(&id) {
            Some(session) if !session.closing => session.topics.insert(topic),
            _ => false,
        }
    }

    /// Remove a topic subscription.
    ///
    /// Returns `true` if the session was subscribed.
    pub async fn unsubscribe(&self, id: ClientId, topic: Topic) -> bool {
        match self.sessions.write().await.get_mut(&id) {
            Some(session) => session.topics.remove(&topic),
            None => false,
        }
    }

    /// Current subscriptions of a session, sorted. Empty for unknown ids.
    pub async fn subscriptions(&self, id: ClientId) -> Vec<Topic> {
        let mut topics: Vec<Topic> = self
            .sessions
            .read()
            .await
            .get(&id)
            .map(|session| session.topics.iter().copied().collect())
            .unwrap_or_default();
        topics.sort();
        topics
    }

    /// Deliver a message to one session, waiting for queue space.
    ///
    /// Returns `false` when the session is gone, closing, or its writer has
    /// exited. The message is dropped in that case.
    pub async fn send_personal(&self, message: ServerMessage, id: ClientId) -> bool {
        let outbound = match self.sessions.read().await.get(&id) {
            Some(session) if !session.closing => session.outbound.clone(),
            _ => {
                tracing::debug!(client_id = %id, kind = message.kind(), "Dropped message for inactive session");
                return false;
            }
        };

        match outbound.send(message).await {
            Ok(()) => true,
            Err(mpsc::error::SendError(message)) => {
                tracing::debug!(client_id = %id, kind = message.kind(), "Outbound queue closed");
                false
            }
        }
    }

    /// Deliver a message to every live session subscribed to `topic`.
    ///
    /// Never waits: sessions with a full or closed queue miss the message.
    /// Returns the number of sessions that accepted it.
    pub async fn broadcast(&self, topic: Topic, message: ServerMessage) -> usize {
        let sessions = self.sessions.read().await;
        let mut delivered = 0;

        for (id, session) in sessions.iter() {
            if session.closing || !session.topics.contains(&topic) {
                continue;
            }
            match session.outbound.try_send(message.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::debug!(client_id = %id, %topic, "Broadcast dropped: {}", e);
                }
            }
        }

        delivered
    }

    /// Spawn a task inside the session's cancellation scope.
    ///
    /// The task is dropped at its next await point once the session is
    /// disconnected. Returns `false` (and spawns nothing) if the session is
    /// unknown or already closing.
    pub async fn spawn_producer<F>(&self, id: ClientId, producer: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(&id).filter(|s| !s.closing) else {
            return false;
        };

        let scope = session.scope.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = scope.cancelled() => {}
                _ = producer => {}
            }
        });
        session.producers.push(handle);
        true
    }

    /// Wait for the next command from a client transport.
    ///
    /// Returns `None` once the transport closes or errors. Binary frames and
    /// text that does not decode are logged and skipped.
    pub async fn receive<S>(&self, id: ClientId, inbound: &mut S) -> Option<ClientMessage>
    where
        S: Stream<Item = Result<Message, axum::Error>> + Unpin,
    {
        while let Some(frame) = inbound.next().await {
            match frame {
                Ok(Message::Text(text)) => match ClientMessage::decode(&text) {
                    Ok(message) => return Some(message),
                    Err(e) => {
                        tracing::warn!(client_id = %id, "Skipping undecodable message: {}", e);
                    }
                },
                Ok(Message::Binary(_)) => {
                    tracing::warn!(client_id = %id, "Received unsupported binary message");
                }
                // Protocol-level ping/pong is answered by axum
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::debug!(client_id = %id, "Client sent close frame");
                    return None;
                }
                Err(e) => {
                    tracing::debug!(client_id = %id, "Receive error: {}", e);
                    return None;
                }
            }
        }
        None
    }

    /// Tear down a session. Safe to call more than once.
    ///
    /// Returns once every producer of the session has stopped; no message
    /// from this session's producers is queued after that point.
    pub async fn disconnect(&self, id: ClientId) {
        let (scope, producers) = {
            let mut sessions = self.sessions.write().await;
            match sessions.get_mut(&id) {
                Some(session) if !session.closing => {
                    session.closing = true;
                    (session.scope.clone(), std::mem::take(&mut session.producers))
                }
                _ => return,
            }
        };

        scope.cancel();
        for producer in producers {
            if let Err(e) = producer.await {
                if e.is_panic() {
                    tracing::error!(client_id = %id, "Producer panicked: {}", e);
                }
            }
        }

        let mut sessions = self.sessions.write().await;
        sessions.remove(&id);
        tracing::info!(client_id = %id, total = sessions.len(), "Client disconnected");
    }

    /// Disconnect every session. Used during graceful shutdown.
    pub async fn disconnect_all(&self) {
        let ids: Vec<ClientId> = self.sessions.read().await.keys().copied().collect();
        for id in ids {
            self.disconnect(id).await;
        }
    }

    /// Whether a session is registered and not closing.
    pub async fn is_connected(&self, id: ClientId) -> bool {
        self.sessions
            .read()
            .await
            .get(&id)
            .is_some_and(|session| !session.closing)
    }

    /// Number of registered sessions.
    pub async fn connection_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(CancellationToken::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn channel() -> (mpsc::Sender<ServerMessage>, mpsc::Receiver<ServerMessage>) {
        mpsc::channel(16)
    }

    #[tokio::test]
    async fn connect_allocates_distinct_ids() {
        let manager = ConnectionManager::default();
        let (tx1, _rx1) = channel();
        let (tx2, _rx2) = channel();

        let a = manager.connect(tx1).await;
        let b = manager.connect(tx2).await;

        assert_ne!(a, b);
        assert_eq!(manager.connection_count().await, 2);
    }

    #[tokio::test]
    async fn subscribe_is_idempotent() {
        let manager = ConnectionManager::default();
        let (tx, _rx) = channel();
        let id = manager.connect(tx).await;

        assert!(manager.subscribe(id, Topic::Vitals).await);
        assert!(!manager.subscribe(id, Topic::Vitals).await);
        assert_eq!(manager.subscriptions(id).await, vec![Topic::Vitals]);
    }

    #[tokio::test]
    async fn subscribe_unknown_session_is_noop() {
        let manager = ConnectionManager::default();

        assert!(!manager.subscribe(ClientId::new(), Topic::Alerts).await);
        assert_eq!(manager.connection_count().await, 0);
    }

    #[tokio::test]
    async fn unsubscribe_removes_topic() {
        let manager = ConnectionManager::default();
        let (tx, _rx) = channel();
        let id = manager.connect(tx).await;
        manager.subscribe(id, Topic::Vitals).await;
        manager.subscribe(id, Topic::Alerts).await;

        assert!(manager.unsubscribe(id, Topic::Vitals).await);
        assert!(!manager.unsubscribe(id, Topic::Vitals).await);
        assert_eq!(manager.subscriptions(id).await, vec![Topic::Alerts]);
    }

    #[tokio::test]
    async fn send_personal_reaches_only_target() {
        let manager = ConnectionManager::default();
        let (tx1, mut rx1) = channel();
        let (tx2, mut rx2) = channel();
        let a = manager.connect(tx1).await;
        let _b = manager.connect(tx2).await;

        assert!(manager.send_personal(ServerMessage::pong(), a).await);

        assert_eq!(rx1.recv().await.unwrap().kind(), "pong");
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn send_and_disconnect_after_disconnect_are_noops() {
        let manager = ConnectionManager::default();
        let (tx, mut rx) = channel();
        let id = manager.connect(tx).await;

        manager.disconnect(id).await;
        manager.disconnect(id).await;

        assert!(!manager.send_personal(ServerMessage::pong(), id).await);
        assert!(!manager.is_connected(id).await);
        assert_eq!(manager.connection_count().await, 0);
        // Sender was dropped with the session
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn broadcast_reaches_only_subscribers() {
        let manager = ConnectionManager::default();
        let (tx1, mut rx1) = channel();
        let (tx2, mut rx2) = channel();
        let a = manager.connect(tx1).await;
        let b = manager.connect(tx2).await;
        manager.subscribe(a, Topic::Alerts).await;
        manager.subscribe(b, Topic::Vitals).await;

        let delivered = manager
            .broadcast(Topic::Alerts, ServerMessage::alert(json!({"id": 1})))
            .await;

        assert_eq!(delivered, 1);
        assert_eq!(rx1.recv().await.unwrap().kind(), "alert");
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_drops_when_queue_full() {
        let manager = ConnectionManager::default();
        let (tx, _rx) = mpsc::channel(1);
        let id = manager.connect(tx).await;
        manager.subscribe(id, Topic::Agents).await;

        assert_eq!(manager.broadcast(Topic::Agents, ServerMessage::pong()).await, 1);
        assert_eq!(manager.broadcast(Topic::Agents, ServerMessage::pong()).await, 0);
    }

    #[tokio::test]
    async fn disconnect_stops_exactly_that_sessions_producers() {
        let manager = Arc::new(ConnectionManager::default());
        let (tx1, _rx1) = channel();
        let (tx2, _rx2) = channel();
        let a = manager.connect(tx1).await;
        let b = manager.connect(tx2).await;

        let ticks_a = Arc::new(AtomicUsize::new(0));
        let ticks_b = Arc::new(AtomicUsize::new(0));
        for (id, ticks) in [(a, ticks_a.clone()), (b, ticks_b.clone())] {
            manager
                .spawn_producer(id, async move {
                    loop {
                        ticks.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(5)).await;
                    }
                })
                .await;
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
        manager.disconnect(a).await;
        let frozen = ticks_a.load(Ordering::SeqCst);
        let before_b = ticks_b.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(ticks_a.load(Ordering::SeqCst), frozen);
        assert!(ticks_b.load(Ordering::SeqCst) > before_b);
        assert!(manager.is_connected(b).await);
    }

    #[tokio::test]
    async fn no_producer_messages_after_disconnect() {
        let manager = Arc::new(ConnectionManager::default());
        let (tx, mut rx) = mpsc::channel(256);
        let id = manager.connect(tx).await;

        let producer_manager = manager.clone();
        manager
            .spawn_producer(id, async move {
                loop {
                    producer_manager.send_personal(ServerMessage::pong(), id).await;
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
            })
            .await;

        tokio::time::sleep(Duration::from_millis(15)).await;
        manager.disconnect(id).await;

        // Everything queued before disconnect drains, then the channel ends
        while rx.recv().await.is_some() {}
        assert!(!manager.send_personal(ServerMessage::pong(), id).await);
    }

    #[tokio::test]
    async fn spawn_producer_refused_after_disconnect() {
        let manager = ConnectionManager::default();
        let (tx, _rx) = channel();
        let id = manager.connect(tx).await;
        manager.disconnect(id).await;

        assert!(!manager.spawn_producer(id, async {}).await);
    }

    #[tokio::test]
    async fn shutdown_token_cancels_every_session() {
        let shutdown = CancellationToken::new();
        let manager = ConnectionManager::new(shutdown.clone());
        let (tx, _rx) = channel();
        let id = manager.connect(tx).await;

        let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();
        manager
            .spawn_producer(id, async move {
                let _done = done_tx;
                std::future::pending::<()>().await;
            })
            .await;

        shutdown.cancel();

        // The producer future (and its oneshot sender) is dropped on cancel
        assert!(done_rx.await.is_err());
        manager.disconnect_all().await;
        assert_eq!(manager.connection_count().await, 0);
    }

    #[tokio::test]
    async fn receive_skips_bad_frames_and_ends_on_close() {
        let manager = ConnectionManager::default();
        let id = ClientId::new();
        let frames: Vec<Result<Message, axum::Error>> = vec![
            Ok(Message::Binary(vec![1, 2, 3])),
            Ok(Message::Text("{not json".to_string())),
            Ok(Message::Text(r#"{"type":"ping"}"#.to_string())),
            Ok(Message::Close(None)),
            Ok(Message::Text(r#"{"type":"ping"}"#.to_string())),
        ];
        let mut inbound = futures::stream::iter(frames);

        assert_eq!(manager.receive(id, &mut inbound).await, Some(ClientMessage::Ping));
        assert_eq!(manager.receive(id, &mut inbound).await, None);
    }
}
