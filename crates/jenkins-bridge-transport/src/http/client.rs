//! HTTP transport client implementation
//!
//! Implements the Transport trait on top of one pooled reqwest client.
//! Only `GET` requests are retried; everything else is sent exactly once.

use crate::error::{Result, TransportError};
use crate::retry::BackoffStrategy;
use crate::traits::Transport;
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub use super::retry::RetryPolicy;

/// HTTP transport implementation
///
/// Handles HTTP requests with:
/// - Retries with exponential backoff for `GET` on connection failures and 5xx
/// - Connection pooling (idle connections per host, idle timeout)
/// - Optional custom trust root and certificate verification toggle
/// - A cookie store, so session-bound tokens survive between requests
/// - Redirects left to the caller, so `Location` headers stay visible
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: ReqwestClient,
    retry_policy: RetryPolicy,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new HTTP transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Create a new HTTP transport with custom configuration
    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(true)
            .danger_accept_invalid_certs(config.tls.accept_invalid_certs);

        if let Some(path) = &config.tls.ca_cert_path {
            builder = builder.add_root_certificate(load_ca_certificate(path)?);
        }

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Builder(e.to_string()))?;

        Ok(Self {
            client,
            retry_policy: config.retry_policy,
            timeout: config.timeout,
        })
    }

    /// Set the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// The retry policy applied to `GET` requests
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// The per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send_once(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        self.client
            .execute(request)
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        if request.method() != reqwest::Method::GET {
            debug!(method = %request.method(), url = %request.url(), "Sending request without retry");
            return self.send_once(request).await;
        }

        let max_retries = self.retry_policy.max_retries();
        let mut attempt: u32 = 0;

        loop {
            // A request whose body cannot be cloned gets exactly one attempt
            let Some(attempt_request) = request.try_clone() else {
                return self.send_once(request).await;
            };

            debug!(attempt, method = "GET", url = %request.url(), "Sending request");

            let failure = match self.send_once(attempt_request).await {
                Ok(response) if response.status().as_u16() < 500 => return Ok(response),
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = response.text().await.unwrap_or_else(|err| {
                        debug!(status, error = %err, "Failed to read server error body");
                        String::new()
                    });
                    TransportError::ServerError { status, body }
                }
                Err(err) => err,
            };

            if !RetryPolicy::is_retryable(&failure) {
                return Err(failure);
            }

            let Some(delay) = self.retry_policy.next_delay(attempt) else {
                warn!(
                    attempts = attempt + 1,
                    url = %request.url(),
                    error = %failure,
                    "Retries exhausted"
                );
                return Err(TransportError::RetriesExhausted {
                    attempts: attempt + 1,
                    last: Box::new(failure),
                });
            };

            warn!(
                attempt,
                max_retries,
                url = %request.url(),
                delay_ms = delay.as_millis() as u64,
                error = %failure,
                "Request failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn load_ca_certificate(path: &Path) -> Result<reqwest::Certificate> {
    let pem = std::fs::read(path)?;

    if !pem
        .windows(b"-----BEGIN CERTIFICATE-----".len())
        .any(|window| window == b"-----BEGIN CERTIFICATE-----")
    {
        return Err(TransportError::Tls(format!(
            "no PEM certificate found in {}",
            path.display()
        )));
    }

    reqwest::Certificate::from_pem(&pem).map_err(|e| {
        TransportError::Tls(format!(
            "failed to parse CA certificate {}: {}",
            path.display(),
            e
        ))
    })
}

/// TLS trust configuration
#[derive(Clone, Debug, Default)]
pub struct TlsConfig {
    /// Skip server certificate verification
    pub accept_invalid_certs: bool,

    /// PEM file with an additional trusted root certificate
    pub ca_cert_path: Option<PathBuf>,
}

/// HTTP transport configuration
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// How long an idle pooled connection is kept
    pub pool_idle_timeout: Duration,

    /// Retry policy for `GET` requests
    pub retry_policy: RetryPolicy,

    /// TLS settings
    pub tls: TlsConfig,

    /// Value for the `User-Agent` header
    pub user_agent: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 10,
            pool_idle_timeout: Duration::from_secs(90),
            retry_policy: RetryPolicy::default(),
            tls: TlsConfig::default(),
            user_agent: None,
        }
    }
}
