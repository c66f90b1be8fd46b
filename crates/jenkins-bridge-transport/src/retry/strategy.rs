//! Backoff strategy trait.

use std::time::Duration;

/// A schedule for retrying failed operations.
///
/// Implementations decide how long to wait before each retry and when to give
/// up. The transport owns the retry loop; the strategy only answers questions
/// about the schedule, so it stays object safe.
///
/// # Examples
///
/// ```rust
/// use jenkins_bridge_transport::retry::{BackoffStrategy, ExponentialBackoff};
/// use std::time::Duration;
///
/// let backoff = ExponentialBackoff::builder()
///     .max_retries(2)
///     .initial_delay(Duration::from_millis(100))
///     .build();
///
/// let schedule: Vec<_> = (0..backoff.max_retries())
///     .filter_map(|attempt| backoff.next_delay(attempt))
///     .collect();
/// assert_eq!(schedule, vec![Duration::from_millis(100), Duration::from_millis(200)]);
/// ```
pub trait BackoffStrategy: Send + Sync + std::fmt::Debug {
    /// Calculate the delay before the next retry attempt.
    ///
    /// `attempt` is 0-indexed: `next_delay(0)` is the wait between the initial
    /// request and the first retry.
    ///
    /// Returns `None` when no further retries should be attempted.
    fn next_delay(&self, attempt: u32) -> Option<Duration>;

    /// Maximum number of retries after the initial attempt.
    ///
    /// With `max_retries() == 3` a request is sent at most 4 times.
    fn max_retries(&self) -> u32;

    /// Full delay schedule, one entry per retry.
    fn schedule(&self) -> Vec<Duration> {
        (0..self.max_retries())
            .map_while(|attempt| self.next_delay(attempt))
            .collect()
    }
}
