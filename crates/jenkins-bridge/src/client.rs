//! Main client implementation for the Jenkins REST API

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use jenkins_bridge_transport::{HttpTransport, HttpTransportConfig, RetryPolicy, TlsConfig, Transport};
use secrecy::SecretString;
use tracing::debug;

use crate::{
    auth::Credentials,
    config::JenkinsConfig,
    crumb::CrumbPolicy,
    error::Result,
    http::HttpExecutor,
    resources::{Artifacts, Builds, Jobs, Nodes, Pipeline, Queue, System, Views},
};

/// Main client for interacting with a Jenkins controller.
///
/// The client owns one pooled transport and the credentials. It is cheap to
/// clone and safe to share between tasks; every operation takes its own
/// [`Context`](crate::Context).
///
/// # Example
///
/// ```rust,no_run
/// use jenkins_bridge::{Client, Context};
///
/// # async fn example() -> jenkins_bridge::Result<()> {
/// let client = Client::builder()
///     .base_url("https://ci.example.com")
///     .username("alice")
///     .api_token("11aa22bb")
///     .build()?;
///
/// let jobs = client.jobs().list(&Context::background(), None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    executor: HttpExecutor,
    stop_settle_delay: Duration,
}

impl Client {
    /// Create an anonymous client for `base_url` with default settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from `JENKINS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_config(JenkinsConfig::from_env()?)
    }

    /// Create a client from a configuration object.
    pub fn from_config(config: JenkinsConfig) -> Result<Self> {
        config.validate()?;

        let transport_config = HttpTransportConfig {
            timeout: config.timeout,
            pool_max_idle_per_host: config.connection_pool.max_idle_per_host,
            pool_idle_timeout: config.connection_pool.idle_timeout,
            retry_policy: retry_policy(&config),
            tls: TlsConfig {
                accept_invalid_certs: config.tls_skip_verify,
                ca_cert_path: config.ca_cert_path.clone(),
            },
            user_agent: Some(crate::USER_AGENT.to_string()),
            ..Default::default()
        };
        let transport = HttpTransport::with_config(transport_config)?;

        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client that sends through a custom transport.
    ///
    /// Retry and TLS settings in `config` are ignored; they belong to the
    /// transport.
    pub fn with_transport(config: JenkinsConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let base_url = config.validate()?;
        let credentials = Credentials::from_config(&config);

        debug!(
            base_url = %base_url,
            username = credentials.username().unwrap_or("<anonymous>"),
            crumb_policy = %config.crumb_policy,
            "Jenkins client configured"
        );

        let executor = HttpExecutor::new(transport, base_url, credentials, config.crumb_policy);
        Ok(Self {
            inner: Arc::new(ClientInner {
                executor,
                stop_settle_delay: config.stop_settle_delay,
            }),
        })
    }

    /// The validated server base URL.
    pub fn base_url(&self) -> &str {
        self.inner.executor.base_url().as_str()
    }

    /// Access the Jobs API.
    pub fn jobs(&self) -> Jobs {
        Jobs::new(self.clone())
    }

    /// Access the Builds API: lookup, logs, trigger and stop.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use jenkins_bridge::{Client, Context};
    /// # use std::collections::BTreeMap;
    /// # async fn example(client: Client) -> jenkins_bridge::Result<()> {
    /// let mut params = BTreeMap::new();
    /// params.insert("BRANCH".to_string(), "main".to_string());
    /// let item = client.builds().trigger(&Context::background(), "deploy", &params).await?;
    /// println!("queued as {}", item.id);
    /// # Ok(())
    /// # }
    /// ```
    pub fn builds(&self) -> Builds {
        Builds::new(self.clone())
    }

    /// Access the Artifacts API.
    pub fn artifacts(&self) -> Artifacts {
        Artifacts::new(self.clone())
    }

    /// Access the build queue.
    pub fn queue(&self) -> Queue {
        Queue::new(self.clone())
    }

    /// Access the Views API.
    pub fn views(&self) -> Views {
        Views::new(self.clone())
    }

    /// Access build agents.
    pub fn nodes(&self) -> Nodes {
        Nodes::new(self.clone())
    }

    /// Access pipeline definitions.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.clone())
    }

    /// Access controller-level information.
    pub fn system(&self) -> System {
        System::new(self.clone())
    }

    pub(crate) fn executor(&self) -> &HttpExecutor {
        &self.inner.executor
    }

    pub(crate) fn stop_settle_delay(&self) -> Duration {
        self.inner.stop_settle_delay
    }
}

/// Read retry schedule: `retry_backoff * 2^k` with no upper cap.
fn retry_policy(config: &JenkinsConfig) -> RetryPolicy {
    RetryPolicy::builder()
        .max_retries(config.max_retries)
        .initial_delay(config.retry_backoff)
        .max_delay(Duration::MAX)
        .jitter(config.retry_jitter)
        .build()
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("executor", &self.inner.executor)
            .field("stop_settle_delay", &self.inner.stop_settle_delay)
            .finish()
    }
}

/// Builder for creating a configured client.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: JenkinsConfig,
}

impl ClientBuilder {
    /// Start from an existing configuration.
    pub fn from_config(config: JenkinsConfig) -> Self {
        Self { config }
    }

    /// Set the server base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the username for basic authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self
    }

    /// Set the password (used only when no API token is set).
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(SecretString::new(password.into().into_boxed_str()));
        self
    }

    /// Set the API token.
    pub fn api_token(mut self, api_token: impl Into<String>) -> Self {
        self.config.api_token = Some(SecretString::new(api_token.into().into_boxed_str()));
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the maximum number of retries for reads.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Set the delay before the first retry.
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.config.retry_backoff = backoff;
        self
    }

    /// Set the behavior when the CSRF crumb cannot be fetched.
    pub fn crumb_policy(mut self, policy: CrumbPolicy) -> Self {
        self.config.crumb_policy = policy;
        self
    }

    /// Set the wait between a stop request and its verification read.
    pub fn stop_settle_delay(mut self, delay: Duration) -> Self {
        self.config.stop_settle_delay = delay;
        self
    }

    /// Accept any server certificate.
    pub fn tls_skip_verify(mut self, skip: bool) -> Self {
        self.config.tls_skip_verify = skip;
        self
    }

    /// Trust an additional PEM root certificate.
    pub fn ca_cert_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ca_cert_path = Some(path.into());
        self
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config)
    }

    /// Build the client over a custom transport.
    pub fn build_with_transport(self, transport: Arc<dyn Transport>) -> Result<Client> {
        Client::with_transport(self.config, transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use assert_matches::assert_matches;
    use jenkins_bridge_transport::BackoffStrategy;

    #[test]
    fn test_client_builder() {
        let client = Client::builder()
            .base_url("https://ci.example.com/jenkins")
            .username("alice")
            .api_token("token")
            .timeout(Duration::from_secs(10))
            .max_retries(5)
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://ci.example.com/jenkins");
        assert_eq!(client.stop_settle_delay(), crate::config::DEFAULT_STOP_SETTLE_DELAY);
    }

    #[test]
    fn test_new_requires_valid_url() {
        assert_matches!(Client::new("not a url"), Err(Error::InvalidUrl(_)));
        assert_matches!(Client::new("ftp://ci.example.com"), Err(Error::InvalidUrl(_)));
    }

    #[test]
    fn test_missing_url() {
        assert_matches!(Client::builder().build(), Err(Error::InvalidUrl(_)));
    }

    #[test]
    fn test_timeout_out_of_bounds() {
        let result = Client::builder()
            .base_url("https://ci.example.com")
            .timeout(Duration::from_millis(10))
            .build();
        assert_matches!(result, Err(Error::Config(_)));
    }

    #[test]
    fn test_missing_ca_cert_fails_at_build() {
        let result = Client::builder()
            .base_url("https://ci.example.com")
            .ca_cert_path("/nonexistent/ca.pem")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let client = Client::builder()
            .base_url("https://ci.example.com")
            .username("alice")
            .password("hunter2")
            .build()
            .unwrap();
        let rendered = format!("{:?}", client);
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_clones_share_state() {
        let client = Client::new("https://ci.example.com").unwrap();
        let clone = client.clone();
        assert!(Arc::ptr_eq(&client.inner, &clone.inner));
    }

    #[test]
    fn test_long_backoff_schedule_is_not_capped() {
        let config = JenkinsConfig {
            base_url: Some("https://ci.example.com".to_string()),
            max_retries: 3,
            retry_backoff: Duration::from_secs(40),
            ..Default::default()
        };

        assert_eq!(
            retry_policy(&config).schedule(),
            vec![
                Duration::from_secs(40),
                Duration::from_secs(80),
                Duration::from_secs(160),
            ]
        );
        assert!(Client::from_config(config).is_ok());
    }
}
