//! Retry policy for the HTTP transport

use crate::error::TransportError;
use crate::retry::{BackoffStrategy, ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;

/// HTTP retry policy.
///
/// Wraps an [`ExponentialBackoff`] and decides which failures are worth
/// another attempt. Only the transport consults it, and only for `GET`.
///
/// # Default Configuration
///
/// - `max_retries`: 3
/// - `initial_delay`: 1s
/// - `max_delay`: 60s
/// - `multiplier`: 2.0
/// - `jitter`: 0.0
///
/// # Examples
///
/// ```rust
/// use jenkins_bridge_transport::http::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .max_retries(5)
///     .initial_delay(Duration::from_millis(200))
///     .build();
/// assert_eq!(policy.calculate_delay(1), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryPolicy {
    inner: ExponentialBackoff,
}

impl RetryPolicy {
    /// Create a new builder for configuring the retry policy.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::builder().max_retries(0).build()
    }

    /// Check if a transport error should be retried.
    ///
    /// Retryable: timeouts, connection failures, mid-request failures and 5xx
    /// responses. Not retryable: malformed requests, TLS setup, I/O errors.
    pub fn is_retryable(error: &TransportError) -> bool {
        match error {
            TransportError::Timeout(_) => true,
            TransportError::Connection(_) => true,
            TransportError::Request(_) => true,
            TransportError::ServerError { .. } => true,

            TransportError::Builder(_) => false,
            TransportError::RetriesExhausted { .. } => false,
            TransportError::Tls(_) => false,
            TransportError::Io(_) => false,
        }
    }

    /// Get the underlying ExponentialBackoff instance.
    pub fn inner(&self) -> &ExponentialBackoff {
        &self.inner
    }

    /// Delay before retry `attempt` (0-indexed), zero once retries are spent.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        self.inner.next_delay(attempt).unwrap_or(Duration::ZERO)
    }
}

impl BackoffStrategy for RetryPolicy {
    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        self.inner.next_delay(attempt)
    }

    fn max_retries(&self) -> u32 {
        self.inner.max_retries()
    }
}

/// Builder for HTTP retry policies.
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    inner: ExponentialBackoffBuilder,
}

impl RetryPolicyBuilder {
    /// Set the maximum number of retry attempts.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.inner = self.inner.max_retries(max_retries);
        self
    }

    /// Set the initial delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.inner = self.inner.initial_delay(delay);
        self
    }

    /// Set the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.inner = self.inner.max_delay(delay);
        self
    }

    /// Set the jitter factor (0.0 to 1.0).
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.inner = self.inner.jitter(jitter);
        self
    }

    /// Build the retry policy.
    pub fn build(self) -> RetryPolicy {
        RetryPolicy {
            inner: self.inner.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries(), 3);
        assert_eq!(policy.calculate_delay(0), Duration::from_secs(1));
        assert_eq!(policy.calculate_delay(2), Duration::from_secs(4));
        assert_eq!(policy.calculate_delay(3), Duration::ZERO);
    }

    #[test]
    fn test_none_policy() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.max_retries(), 0);
        assert!(policy.schedule().is_empty());
    }

    #[test]
    fn test_is_retryable() {
        assert!(RetryPolicy::is_retryable(&TransportError::Timeout(
            Duration::from_secs(30)
        )));
        assert!(RetryPolicy::is_retryable(&TransportError::Connection(
            "connection refused".to_string()
        )));
        assert!(RetryPolicy::is_retryable(&TransportError::ServerError {
            status: 502,
            body: String::new(),
        }));

        assert!(!RetryPolicy::is_retryable(&TransportError::Builder(
            "bad header".to_string()
        )));
        assert!(!RetryPolicy::is_retryable(&TransportError::Io(
            std::io::Error::other("io error")
        )));
    }
}
