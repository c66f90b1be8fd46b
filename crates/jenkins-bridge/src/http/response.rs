//! Buffered HTTP response

use crate::error::{Error, ResourceRef, Result};
use bytes::Bytes;
use http::{HeaderMap, StatusCode, header};

/// A response whose body has been read in full.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Create a new response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value as text, if present and valid.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `Location` header.
    pub fn location(&self) -> Option<&str> {
        self.header(header::LOCATION.as_str())
    }

    /// Get the raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text; invalid UTF-8 is replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Check if the response is successful (2xx status).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Classify this response as an error for `resource`.
    pub fn error_for(&self, resource: ResourceRef) -> Error {
        Error::from_status(self.status.as_u16(), &self.text(), resource)
    }

    /// Pass 2xx responses through, classify everything else.
    pub fn ensure_success(self, resource: ResourceRef) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.error_for(resource))
        }
    }
}
