//! # jenkins-bridge
//!
//! Resilient, typed client for the Jenkins REST API:
//! - Field-projected reads of jobs, builds, artifacts, queue, views and nodes
//! - Build trigger with parameter validation and queue-item correlation
//! - Build stop with post-condition verification
//! - Inline pipeline script retrieval
//! - Basic authentication and the CSRF crumb handshake
//! - Automatic retries with exponential backoff for reads only
//! - Caller-controlled deadlines and cancellation on every operation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jenkins_bridge::{Client, Context};
//! use std::collections::BTreeMap;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder()
//!         .base_url("https://ci.example.com")
//!         .username("alice")
//!         .api_token("11aa22bb")
//!         .build()?;
//!
//!     let ctx = Context::with_timeout(Duration::from_secs(60));
//!
//!     let mut params = BTreeMap::new();
//!     params.insert("BRANCH".to_string(), "main".to_string());
//!     let item = client.builds().trigger(&ctx, "deploy", &params).await?;
//!
//!     let build = client
//!         .queue()
//!         .wait_for_build(&ctx, item.id, Duration::from_secs(2))
//!         .await?;
//!     println!("deploy started as #{}", build.number);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("jenkins-bridge/", env!("CARGO_PKG_VERSION"));

// Re-export commonly used types
pub use api::JenkinsApi;
pub use auth::Credentials;
pub use client::{Client, ClientBuilder};
pub use config::{ConnectionPoolConfig, JenkinsConfig};
pub use context::Context;
pub use crumb::{Crumb, CrumbPolicy};
pub use error::{Error, ErrorCode, ResourceRef, Result};
pub use stream::ByteStream;
pub use types::*;

pub use jenkins_bridge_transport as transport;

// Module declarations
pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod crumb;
pub mod decode;
pub mod error;
pub mod http;
pub mod observability;
pub mod resources;
pub mod stream;
pub mod types;
