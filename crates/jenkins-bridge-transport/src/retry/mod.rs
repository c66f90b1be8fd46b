//! Retry schedules and backoff implementations.
//!
//! # Key Types
//!
//! - [`BackoffStrategy`] - How long to wait before each retry, and how many
//! - [`ExponentialBackoff`] - `initial_delay * multiplier^attempt`, optional jitter
//!
//! # Examples
//!
//! ```rust
//! use jenkins_bridge_transport::retry::{BackoffStrategy, ExponentialBackoff};
//! use std::time::Duration;
//!
//! let backoff = ExponentialBackoff::builder()
//!     .max_retries(3)
//!     .initial_delay(Duration::from_secs(1))
//!     .build();
//!
//! assert_eq!(backoff.next_delay(2), Some(Duration::from_secs(4)));
//! ```

mod exponential;
mod strategy;

pub use exponential::{ExponentialBackoff, ExponentialBackoffBuilder};
pub use strategy::BackoffStrategy;
