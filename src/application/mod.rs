//! Application layer - shared context and the flows that span providers.
//!
//! - `context` - the state handed to every HTTP and WebSocket handler
//! - `chat` - mood inference followed by a counselor reply
//! - `simulator` - background generator of synthetic alerts

pub mod chat;
pub mod context;
pub mod simulator;

pub use context::AppContext;
pub use simulator::{EventSimulator, SyntheticEvent, SIMULATOR_SOURCE};
