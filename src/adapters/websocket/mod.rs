//! WebSocket adapters for real-time status streaming.
//!
//! # Architecture
//!
//! ```text
//!   socket ──split──┬── read half ──► session loop ──► providers / orchestrator
//!                   │                      │
//!                   │                 ConnectionManager ◄── producers (vitals, status)
//!                   │                      │                 simulator (alerts topic)
//!                   └── sink ◄── writer ◄──┘ bounded mpsc
//! ```
//!
//! # Components
//!
//! - [`messages`] - wire protocol types
//! - [`topics`] - broadcast topics
//! - [`connections`] - session table, subscriptions and cancellation scopes
//! - [`session`] - per-connection loop and periodic producers
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod connections;
pub mod handler;
pub mod messages;
pub mod session;
pub mod topics;

pub use connections::ConnectionManager;
pub use handler::ws_handler;
pub use messages::{ClientMessage, ConnectedMessage, PongMessage, ServerMessage, UpdateMessage};
pub use session::run_session;
pub use topics::{Topic, UnknownTopic};
