//! Request and response envelopes exchanged with capability providers.
//!
//! Both are schema-light JSON objects on the wire. Providers recover a closed,
//! typed view of a request with [`Request::parse`], and report failure by
//! returning a response that carries an `error` field.

mod request;
mod response;

pub use request::{Request, RequestError};
pub use response::Response;
