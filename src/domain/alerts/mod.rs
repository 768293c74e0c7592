//! Alerts - records raised by the alert provider.

mod alert;
mod severity;

pub use alert::{Alert, AlertId, AlertStatusFilter};
pub use severity::Severity;
