//! WebSocket message types for the streaming channel.
//!
//! Defines the protocol between server and connected clients:
//! - Server → Client: connection acknowledgement, periodic updates, replies
//! - Client → Server: chat, command and ping

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{ClientId, Timestamp};

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Session registered and subscribed.
    Connected(ConnectedMessage),

    /// Periodic vitals reading.
    VitalsUpdate(UpdateMessage),

    /// Periodic system status.
    AgentStatus(UpdateMessage),

    /// Counselor reply to a chat message.
    ChatResponse(UpdateMessage),

    /// Orchestrator reply to a command.
    CommandResponse(UpdateMessage),

    /// Alert raised by the background monitor.
    Alert(UpdateMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

impl ServerMessage {
    pub fn connected(client_id: ClientId) -> Self {
        Self::Connected(ConnectedMessage {
            client_id: client_id.to_string(),
            message: "Connected to MAITRI".to_string(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    pub fn vitals_update(data: Value) -> Self {
        Self::VitalsUpdate(UpdateMessage::now(data))
    }

    pub fn agent_status(data: Value) -> Self {
        Self::AgentStatus(UpdateMessage::now(data))
    }

    pub fn chat_response(data: Value) -> Self {
        Self::ChatResponse(UpdateMessage::now(data))
    }

    pub fn command_response(data: Value) -> Self {
        Self::CommandResponse(UpdateMessage::now(data))
    }

    pub fn alert(data: Value) -> Self {
        Self::Alert(UpdateMessage::now(data))
    }

    pub fn pong() -> Self {
        Self::Pong(PongMessage {
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    /// Wire name of this message, as found in its `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected(_) => "connected",
            Self::VitalsUpdate(_) => "vitals_update",
            Self::AgentStatus(_) => "agent_status",
            Self::ChatResponse(_) => "chat_response",
            Self::CommandResponse(_) => "command_response",
            Self::Alert(_) => "alert",
            Self::Pong(_) => "pong",
        }
    }
}

/// Sent once when a session is established.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectedMessage {
    pub client_id: String,
    pub message: String,
    pub timestamp: String,
}

/// Provider output wrapped for delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateMessage {
    pub data: Value,
    pub timestamp: String,
}

impl UpdateMessage {
    fn now(data: Value) -> Self {
        Self {
            data,
            timestamp: Timestamp::now().to_rfc3339(),
        }
    }
}

/// Heartbeat response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

// ============================================
// Client → Server Messages
// ============================================

/// Commands a client can send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Free text for the counselor.
    Chat { text: String },

    /// Natural-language query for the orchestrator.
    Command { query: String },

    /// Heartbeat request.
    Ping,
}

/// Loose wire shape; `type` is optional and anything unrecognised is chat.
#[derive(Debug, Deserialize)]
struct InboundEnvelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    query: String,
}

impl ClientMessage {
    /// Decode an inbound text frame.
    ///
    /// # Errors
    ///
    /// Fails when the frame is not a JSON object.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        let envelope: InboundEnvelope = serde_json::from_str(text)?;

        Ok(match envelope.kind.as_deref() {
            Some("command") => Self::Command {
                query: envelope.query,
            },
            Some("ping") => Self::Ping,
            _ => Self::Chat {
                text: envelope.text,
            },
        })
    }
}
