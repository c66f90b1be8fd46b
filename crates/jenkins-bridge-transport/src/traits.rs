//! Transport trait
//!
//! The seam between request construction and the wire. Implementations own
//! connection management and any retry policy; callers hand over a fully
//! built request and get back the raw response with the body unread.

use crate::error::Result;
use async_trait::async_trait;

/// Generic transport for sending HTTP requests.
///
/// The response body is not consumed, so callers may stream it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the response once headers are received.
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        (**self).send(request).await
    }
}
