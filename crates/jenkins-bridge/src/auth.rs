//! Basic authentication
//!
//! The server accepts an API token in place of the password, so both styles
//! produce the same `Authorization: Basic` header.

use crate::config::JenkinsConfig;
use crate::error::{Error, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Credentials attached to every request.
#[derive(Clone, Default)]
pub struct Credentials {
    username: Option<String>,
    password: Option<SecretString>,
    api_token: Option<SecretString>,
}

impl Credentials {
    /// No credentials; requests are sent anonymously.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Username and password.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(SecretString::new(password.into().into_boxed_str())),
            api_token: None,
        }
    }

    /// Username and API token.
    pub fn token(username: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: None,
            api_token: Some(SecretString::new(api_token.into().into_boxed_str())),
        }
    }

    /// Credentials taken from a configuration.
    pub fn from_config(config: &JenkinsConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            api_token: config.api_token.clone(),
        }
    }

    /// Configured username, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Whether requests will be sent without an `Authorization` header.
    pub fn is_anonymous(&self) -> bool {
        self.secret_pair().is_none()
    }

    /// `(username, secret)` to encode; the token wins over the password.
    fn secret_pair(&self) -> Option<(&str, &str)> {
        if let Some(token) = &self.api_token {
            return Some((self.username.as_deref().unwrap_or(""), token.expose_secret()));
        }
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username, password.expose_secret())),
            _ => None,
        }
    }

    /// The `Authorization` header value, or `None` for anonymous access.
    ///
    /// The returned value is marked sensitive so it is redacted from HTTP
    /// debug output.
    pub fn authorization(&self) -> Result<Option<HeaderValue>> {
        let Some((username, secret)) = self.secret_pair() else {
            return Ok(None);
        };

        let encoded = STANDARD.encode(format!("{}:{}", username, secret));
        let mut value = HeaderValue::from_str(&format!("Basic {}", encoded))
            .map_err(|e| Error::Config(format!("invalid authorization header: {}", e)))?;
        value.set_sensitive(true);
        Ok(Some(value))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
