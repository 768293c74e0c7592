//! WebSocket upgrade handler for the streaming endpoint.
//!
//! Handles the HTTP → WebSocket upgrade and wires the socket to a session:
//! 1. Upgrade to WebSocket (failures are logged, no session is created)
//! 2. Split the socket; the sink is owned by a single writer task
//! 3. Run the session loop on the read half
//! 4. Wait for the writer to drain once the session is gone

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::application::AppContext;

use super::messages::ServerMessage;
use super::session::run_session;

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(ctx): State<AppContext>) -> Response {
    ws.on_failed_upgrade(|e| tracing::warn!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, ctx))
}

async fn handle_socket(socket: WebSocket, ctx: AppContext) {
    let (sink, stream) = socket.split();
    let (outbound_tx, outbound_rx) = mpsc::channel(ctx.streaming.outbound_buffer);

    let writer = tokio::spawn(write_outbound(sink, outbound_rx));
    let client_id = run_session(ctx, outbound_tx, stream).await;

    if let Err(e) = writer.await {
        tracing::error!(client_id = %client_id, "Writer task failed: {}", e);
    }
}

/// Serialize queued messages onto the socket until the queue closes.
async fn write_outbound(
    mut sink: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<ServerMessage>,
) {
    while let Some(message) = outbound.recv().await {
        let json = match serde_json::to_string(&message) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(kind = message.kind(), "Failed to serialize message: {}", e);
                continue;
            }
        };
        if let Err(e) = sink.send(Message::Text(json)).await {
            tracing::debug!("Send error, closing connection: {}", e);
            return;
        }
    }

    let _ = sink.close().await;
}
