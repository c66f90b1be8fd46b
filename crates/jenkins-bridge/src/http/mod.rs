//! HTTP layer: request descriptions, buffered responses and the executor
//! that sends them through the transport.

pub use request::{ApiRequest, RequestBody};
pub use response::Response;

pub(crate) use executor::HttpExecutor;

mod executor;
mod request;
mod response;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, Method, StatusCode};
