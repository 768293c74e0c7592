//! Domain layer - Core orchestration logic.
//!
//! - [`foundation`] - Identifiers, timestamps and error types
//! - [`messaging`] - Schema-light request/response envelopes
//! - [`orchestration`] - Provider registry and dispatcher
//! - [`alerts`] - Alert records and severity scale

pub mod alerts;
pub mod foundation;
pub mod messaging;
pub mod orchestration;
