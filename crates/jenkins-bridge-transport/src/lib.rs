//! Transport layer for jenkins-bridge
//!
//! Provides a trait-based transport abstraction over a single pooled
//! `reqwest` client. The HTTP transport retries idempotent reads only and
//! passes every other request through exactly once.
//!
//! # Architecture
//!
//! - **Transport trait**: seam between the request executor and the wire
//! - **HTTP transport**: pooled reqwest client with TLS and cookie handling
//! - **Retry**: exponential backoff schedule applied to `GET` requests
//!
//! # Usage
//!
//! ```no_run
//! use jenkins_bridge_transport::{HttpTransport, Transport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new()?;
//! let url = "https://jenkins.example.com/api/json".parse()?;
//! let request = reqwest::Request::new(reqwest::Method::GET, url);
//! let response = transport.send(request).await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod retry;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use http::{HttpTransport, HttpTransportConfig, RetryPolicy, TlsConfig};
pub use retry::{BackoffStrategy, ExponentialBackoff, ExponentialBackoffBuilder};
pub use traits::Transport;
