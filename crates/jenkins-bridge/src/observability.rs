//! Structured logging for requests sent to the server
//!
//! Every request the executor sends is logged through this layer so fields
//! stay consistent: `method`, `path`, `status`, `elapsed_ms`, `body_size`.
//! Query strings are left out of `path`; they can carry build parameters.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path without query
    pub path: String,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
    /// Whether a CSRF crumb was attached
    pub crumb: bool,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body_size: None,
            crumb: false,
        }
    }

    /// Set the request body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Record whether a crumb was attached
    pub fn with_crumb(mut self, crumb: bool) -> Self {
        self.crumb = crumb;
        self
    }

    /// Log request being sent
    pub fn log_request(&self) {
        debug!(
            method = %self.method,
            path = %self.path,
            body_size = self.body_size,
            crumb = self.crumb,
            "Sending Jenkins request"
        );
    }
}

/// Response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code
    pub status: u16,
    /// Response body size in bytes (optional)
    pub body_size: Option<usize>,
    /// Time elapsed for the request
    pub elapsed: Duration,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(status: u16, elapsed: Duration) -> Self {
        Self {
            status,
            body_size: None,
            elapsed,
        }
    }

    /// Set the response body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log by status: 2xx/3xx at info, anything else at warn.
    pub fn log(&self, request: &RequestMetadata) {
        if self.status < 400 {
            self.log_success(request);
        } else {
            self.log_error(request, "non-success status");
        }
    }

    /// Log successful response
    pub fn log_success(&self, request: &RequestMetadata) {
        info!(
            method = %request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            body_size = self.body_size,
            "Jenkins request succeeded"
        );
    }

    /// Log failed response
    pub fn log_error(&self, request: &RequestMetadata, error: &str) {
        warn!(
            method = %request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            error = %error,
            "Jenkins request failed"
        );
    }
}

/// Log a request that never produced a response.
pub fn log_transport_failure(request: &RequestMetadata, elapsed: Duration, error: &str) {
    warn!(
        method = %request.method,
        path = %request.path,
        elapsed_ms = elapsed.as_millis(),
        error = %error,
        "Jenkins request did not complete"
    );
}

/// Timer for measuring request duration
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_metadata_creation() {
        let metadata = RequestMetadata::new("POST", "/job/deploy/build");
        assert_eq!(metadata.method, "POST");
        assert_eq!(metadata.path, "/job/deploy/build");
        assert_eq!(metadata.body_size, None);
        assert!(!metadata.crumb);
    }

    #[test]
    fn test_request_metadata_builders() {
        let metadata = RequestMetadata::new("POST", "/createView")
            .with_body_size(512)
            .with_crumb(true);
        assert_eq!(metadata.body_size, Some(512));
        assert!(metadata.crumb);
        metadata.log_request();
    }

    #[test]
    fn test_response_metadata() {
        let elapsed = Duration::from_millis(120);
        let metadata = ResponseMetadata::new(404, elapsed).with_body_size(10);
        assert_eq!(metadata.status, 404);
        assert_eq!(metadata.elapsed, elapsed);
        assert_eq!(metadata.body_size, Some(10));
        metadata.log(&RequestMetadata::new("GET", "/job/x/api/json"));
    }

    #[test]
    fn test_request_timer() {
        let timer = RequestTimer::start();
        std::thread::sleep(Duration::from_millis(10));
        assert!(timer.elapsed().as_millis() >= 10);
    }
}
