//! MAITRI - multi-agent crew well-being backend
//!
//! A registry of capability providers behind an orchestrator, exposed over a
//! REST API and a WebSocket channel that streams vitals, agent status and
//! alerts to every connected client.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
