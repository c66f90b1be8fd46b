//! HTTP transport implementation
//!
//! Provides a pooled reqwest client that implements the Transport trait,
//! with GET-only retry, TLS trust configuration and a session cookie store.

pub mod client;
pub mod retry;

pub use client::{HttpTransport, HttpTransportConfig, TlsConfig};
pub use retry::RetryPolicy;
