//! Exponential backoff with optional jitter.

use super::strategy::BackoffStrategy;
use std::time::Duration;

/// Exponential backoff strategy.
///
/// Delays between retries grow as `initial_delay * multiplier^attempt`, capped
/// at `max_delay`. Jitter defaults to zero so the schedule is exactly
/// `backoff, 2·backoff, 4·backoff, …`; a non-zero jitter spreads each delay
/// by up to `±jitter` of its value.
///
/// # Formula
///
/// For attempt `n` (0-indexed after the first failure):
/// ```text
/// base_delay = initial_delay * (multiplier ^ n)
/// jittered = base_delay + base_delay * jitter * random(-1.0, +1.0)
/// final_delay = min(jittered, max_delay)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialBackoff {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: f64,
}

impl ExponentialBackoff {
    /// Create a new builder for configuring exponential backoff.
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }

    /// Delay before the first retry.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Upper bound for any single delay.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Jitter factor in `[0.0, 1.0]`.
    pub fn jitter(&self) -> f64 {
        self.jitter
    }
}

impl Default for ExponentialBackoff {
    /// Defaults: 3 retries, 1s initial delay, 60s cap, doubling, no jitter.
    fn default() -> Self {
        ExponentialBackoffBuilder::default().build()
    }
}

impl BackoffStrategy for ExponentialBackoff {
    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries {
            return None;
        }

        // Computed in nanoseconds so power-of-two schedules stay exact
        let base = self.initial_delay.as_nanos() as f64
            * self.multiplier.powi(attempt.min(i32::MAX as u32) as i32);

        let jittered = if self.jitter > 0.0 {
            let jitter_amount = base * self.jitter * (rand::random::<f64>() - 0.5) * 2.0;
            base + jitter_amount
        } else {
            base
        };

        let capped = jittered.min(self.max_delay.as_nanos() as f64).max(0.0);
        Some(Duration::from_nanos(capped.round() as u64))
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Builder for configuring `ExponentialBackoff`.
///
/// ```rust
/// use jenkins_bridge_transport::retry::ExponentialBackoff;
/// use std::time::Duration;
///
/// let backoff = ExponentialBackoff::builder()
///     .max_retries(5)
///     .initial_delay(Duration::from_millis(250))
///     .max_delay(Duration::from_secs(30))
///     .jitter(0.1)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ExponentialBackoffBuilder {
    max_retries: Option<u32>,
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
    multiplier: Option<f64>,
    jitter: Option<f64>,
}

impl ExponentialBackoffBuilder {
    /// Set the maximum number of retry attempts. Default: 3
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the delay before the first retry. Default: 1s
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Set the maximum delay between retries. Default: 60s
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the exponential multiplier. Default: 2.0
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Set the jitter factor, clamped to `[0.0, 1.0]`. Default: 0.0
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = Some(jitter.clamp(0.0, 1.0));
        self
    }

    /// Build the `ExponentialBackoff` instance.
    pub fn build(self) -> ExponentialBackoff {
        ExponentialBackoff {
            max_retries: self.max_retries.unwrap_or(3),
            initial_delay: self.initial_delay.unwrap_or(Duration::from_secs(1)),
            max_delay: self.max_delay.unwrap_or(Duration::from_secs(60)),
            multiplier: self.multiplier.unwrap_or(2.0),
            jitter: self.jitter.unwrap_or(0.0),
        }
    }
}
