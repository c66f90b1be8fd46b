//! Configuration for the Jenkins client

use crate::crumb::CrumbPolicy;
use crate::error::{Error, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Shortest accepted request timeout.
pub const MIN_TIMEOUT: Duration = Duration::from_secs(1);
/// Longest accepted request timeout.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(300);
/// Default number of retries for reads.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default initial retry delay.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);
/// Default wait between a stop request and its verification read.
pub const DEFAULT_STOP_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Configuration for the Jenkins client.
///
/// Plain data with defaults; [`JenkinsConfig::load`] layers a TOML file and
/// the environment on top of the defaults, and [`JenkinsConfig::validate`]
/// checks the result before a client is built from it.
#[derive(Debug, Clone)]
pub struct JenkinsConfig {
    /// Server base URL, optionally with a path prefix (`https://ci.example.com/jenkins`)
    pub base_url: Option<String>,

    /// Username for basic authentication
    pub username: Option<String>,

    /// Password, used only when no API token is set
    pub password: Option<SecretString>,

    /// API token, preferred over the password
    pub api_token: Option<SecretString>,

    /// Per-request timeout
    pub timeout: Duration,

    /// Accept any server certificate
    pub tls_skip_verify: bool,

    /// Additional PEM trust root
    pub ca_cert_path: Option<PathBuf>,

    /// Retries for failed reads
    pub max_retries: u32,

    /// Delay before the first retry; doubles per attempt
    pub retry_backoff: Duration,

    /// Random spread applied to retry delays, 0.0 to 1.0
    pub retry_jitter: f64,

    /// Behavior when the CSRF crumb cannot be fetched
    pub crumb_policy: CrumbPolicy,

    /// Wait between a stop request and the verification read
    pub stop_settle_delay: Duration,

    /// Connection pool configuration
    pub connection_pool: ConnectionPoolConfig,
}

impl Default for JenkinsConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            username: None,
            password: None,
            api_token: None,
            timeout: DEFAULT_TIMEOUT,
            tls_skip_verify: false,
            ca_cert_path: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            retry_jitter: 0.0,
            crumb_policy: CrumbPolicy::default(),
            stop_settle_delay: DEFAULT_STOP_SETTLE_DELAY,
            connection_pool: ConnectionPoolConfig::default(),
        }
    }
}

/// Configuration for HTTP connection pooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionPoolConfig {
    /// Maximum number of idle connections per host
    pub max_idle_per_host: usize,

    /// Idle connection timeout
    pub idle_timeout: Duration,
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            idle_timeout: Duration::from_secs(90),
        }
    }
}

fn secret(value: String) -> SecretString {
    SecretString::new(value.into_boxed_str())
}

/// Read an environment variable, treating an empty value as unset.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_value(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| Error::Config(format!("{} has invalid value '{}': {}", name, raw, e)))
        })
        .transpose()
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "{} has invalid boolean value '{}'",
            name, raw
        ))),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    jenkins: FileSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSection {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    api_token: Option<String>,
    timeout_secs: Option<u64>,
    crumb_policy: Option<CrumbPolicy>,
    stop_settle_delay_ms: Option<u64>,
    tls: FileTls,
    retry: FileRetry,
    pool: FilePool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileTls {
    skip_verify: Option<bool>,
    ca_cert: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileRetry {
    max_retries: Option<u32>,
    backoff_ms: Option<u64>,
    jitter: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FilePool {
    max_idle_per_host: Option<usize>,
    idle_timeout_secs: Option<u64>,
}

impl JenkinsConfig {
    /// Create a configuration for `base_url` with all other settings at their defaults.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `JENKINS_URL` for the server base URL
    /// - `JENKINS_USERNAME`, `JENKINS_PASSWORD`, `JENKINS_API_TOKEN` for credentials
    /// - `JENKINS_TIMEOUT` for the request timeout (in seconds)
    /// - `JENKINS_TLS_SKIP_VERIFY` and `JENKINS_CA_CERT` for TLS
    /// - `JENKINS_MAX_RETRIES` and `JENKINS_RETRY_BACKOFF` (in milliseconds)
    /// - `JENKINS_CRUMB_POLICY` (`lenient` or `strict`)
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Overlay any `JENKINS_*` environment variables onto this configuration.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(url) = env_value("JENKINS_URL") {
            self.base_url = Some(url);
        }
        if let Some(username) = env_value("JENKINS_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = env_value("JENKINS_PASSWORD") {
            self.password = Some(secret(password));
        }
        if let Some(token) = env_value("JENKINS_API_TOKEN") {
            self.api_token = Some(secret(token));
        }

        if let Some(secs) = env_parse::<u64>("JENKINS_TIMEOUT")? {
            self.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = env_value("JENKINS_TLS_SKIP_VERIFY") {
            self.tls_skip_verify = parse_bool("JENKINS_TLS_SKIP_VERIFY", &raw)?;
        }
        if let Some(path) = env_value("JENKINS_CA_CERT") {
            self.ca_cert_path = Some(PathBuf::from(path));
        }

        if let Some(retries) = env_parse::<u32>("JENKINS_MAX_RETRIES")? {
            self.max_retries = retries;
        }
        if let Some(ms) = env_parse::<u64>("JENKINS_RETRY_BACKOFF")? {
            self.retry_backoff = Duration::from_millis(ms);
        }

        if let Some(policy) = env_parse::<CrumbPolicy>("JENKINS_CRUMB_POLICY")? {
            self.crumb_policy = policy;
        }

        Ok(self)
    }

    /// Load configuration from the `[jenkins]` table of a TOML file.
    ///
    /// ```toml
    /// [jenkins]
    /// url = "https://ci.example.com"
    /// username = "deploy-bot"
    /// api_token = "..."
    /// timeout_secs = 60
    ///
    /// [jenkins.retry]
    /// max_retries = 5
    /// backoff_ms = 250
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        let section = file.jenkins;
        let mut config = Self::default();

        if section.url.is_some() {
            config.base_url = section.url;
        }
        if section.username.is_some() {
            config.username = section.username;
        }
        config.password = section.password.map(secret).or(config.password);
        config.api_token = section.api_token.map(secret).or(config.api_token);

        if let Some(secs) = section.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(policy) = section.crumb_policy {
            config.crumb_policy = policy;
        }
        if let Some(ms) = section.stop_settle_delay_ms {
            config.stop_settle_delay = Duration::from_millis(ms);
        }

        if let Some(skip) = section.tls.skip_verify {
            config.tls_skip_verify = skip;
        }
        if section.tls.ca_cert.is_some() {
            config.ca_cert_path = section.tls.ca_cert;
        }

        if let Some(retries) = section.retry.max_retries {
            config.max_retries = retries;
        }
        if let Some(ms) = section.retry.backoff_ms {
            config.retry_backoff = Duration::from_millis(ms);
        }
        if let Some(jitter) = section.retry.jitter {
            config.retry_jitter = jitter;
        }

        if let Some(max_idle) = section.pool.max_idle_per_host {
            config.connection_pool.max_idle_per_host = max_idle;
        }
        if let Some(secs) = section.pool.idle_timeout_secs {
            config.connection_pool.idle_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Defaults, then the file at `path` (when given), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides()
    }

    /// Check the configuration and return the parsed base URL.
    ///
    /// Missing credentials are accepted (anonymous read access) but logged.
    pub fn validate(&self) -> Result<Url> {
        let raw = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::InvalidUrl("base URL is empty".to_string()))?;

        let url = Url::parse(raw)
            .map_err(|e| Error::InvalidUrl(format!("'{}' is not a valid URL: {}", raw, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::InvalidUrl(format!(
                "unsupported scheme '{}' in '{}', expected http or https",
                url.scheme(),
                raw
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(Error::InvalidUrl(format!("'{}' has no host", raw)));
        }

        if self.timeout < MIN_TIMEOUT || self.timeout > MAX_TIMEOUT {
            return Err(Error::Config(format!(
                "timeout {:?} is outside the accepted range {:?}..={:?}",
                self.timeout, MIN_TIMEOUT, MAX_TIMEOUT
            )));
        }

        if !(0.0..=1.0).contains(&self.retry_jitter) {
            return Err(Error::Config(format!(
                "retry jitter {} must be between 0.0 and 1.0",
                self.retry_jitter
            )));
        }

        let has_username = self.username.as_deref().is_some_and(|u| !u.is_empty());
        if self.api_token.is_some() && !has_username {
            return Err(Error::Config(
                "an API token requires a username".to_string(),
            ));
        }
        if !has_username {
            warn!(url = %url, "No Jenkins credentials configured, using anonymous access");
        } else if self.api_token.is_none() && self.password.is_none() {
            warn!(url = %url, "Jenkins username set without password or API token");
        }

        Ok(url)
    }
}
