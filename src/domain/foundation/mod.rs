//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps and error types that form the
//! vocabulary of the orchestration domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DispatchError, RegistryError};
pub use ids::{ClientId, ProviderId};
pub use timestamp::Timestamp;
