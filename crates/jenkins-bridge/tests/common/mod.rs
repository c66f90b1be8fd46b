//! Common test utilities and fixtures
//!
//! - wiremock for HTTP mocking (isolated, parallel-safe)
//! - #[tokio::test] for async testing
//! - JSON fixtures shaped like real controller responses

#![allow(dead_code)]

pub mod responses;

use jenkins_bridge::{Client, ClientBuilder};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub use responses::{build_json, crumb_json, job_details_json, parameter_json};

pub const USERNAME: &str = "alice";
pub const API_TOKEN: &str = "11aa22bb";

/// Install a test-writer subscriber once; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builder pointed at `server` with fast retries and a short stop settle delay.
pub fn builder(server: &MockServer) -> ClientBuilder {
    init_tracing();
    Client::builder()
        .base_url(server.uri())
        .username(USERNAME)
        .api_token(API_TOKEN)
        .max_retries(2)
        .retry_backoff(Duration::from_millis(10))
        .stop_settle_delay(Duration::from_millis(10))
}

/// Authenticated client for `server`.
pub fn client(server: &MockServer) -> Client {
    builder(server).build().expect("client should build")
}

/// Serve a crumb from the crumb issuer.
pub async fn mount_crumb(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/crumbIssuer/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(crumb_json()))
        .mount(server)
        .await;
}

/// Controller without CSRF protection.
pub async fn mount_no_crumb(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/crumbIssuer/api/json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

/// Serve `body` for `GET {route}`.
pub async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
