//! Adapters - Implementations of port interfaces and inbound surfaces.
//!
//! - `providers` - capability providers behind the `CapabilityProvider` port
//! - `websocket` - streaming sessions, subscriptions and producers
//! - `http` - REST API and the `/ws` route

pub mod http;
pub mod providers;
pub mod websocket;
