//! HTTP adapter - REST API over the providers plus the `/ws` upgrade route.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::ApiError;
pub use routes::build_router;
