//! CSRF crumb handshake
//!
//! Servers with CSRF protection reject mutations that do not carry a crumb
//! header. The crumb comes from `GET /crumbIssuer/api/json` and is tied to the
//! session cookie of that request, so the transport keeps a cookie store.

use crate::error::{Error, Result};
use http::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Anti-CSRF token attached to mutating requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    /// Header name to send the crumb in, usually `Jenkins-Crumb`
    pub request_field: String,
    /// Crumb value
    pub value: String,
}

impl Crumb {
    /// The crumb as a request header.
    pub fn header(&self) -> Result<(HeaderName, HeaderValue)> {
        let name = HeaderName::from_bytes(self.request_field.as_bytes()).map_err(|e| {
            Error::CsrfHandshake(format!(
                "invalid crumb header name '{}': {}",
                self.request_field, e
            ))
        })?;
        let value = HeaderValue::from_str(&self.value)
            .map_err(|e| Error::CsrfHandshake(format!("invalid crumb value: {}", e)))?;
        Ok((name, value))
    }
}

/// What to do when the crumb cannot be obtained.
///
/// A 404 from the crumb issuer always means "no CSRF protection" and is not a
/// failure under either policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrumbPolicy {
    /// Log a warning and send the mutation without a crumb.
    #[default]
    Lenient,
    /// Fail the mutation with [`Error::CsrfHandshake`].
    Strict,
}

impl CrumbPolicy {
    /// Apply the policy to the outcome of a crumb fetch.
    ///
    /// Cancellation and deadline expiry pass through untouched under either
    /// policy.
    pub fn resolve(self, outcome: Result<Option<Crumb>>) -> Result<Option<Crumb>> {
        match outcome {
            Ok(crumb) => Ok(crumb),
            Err(err @ (Error::Cancelled | Error::Timeout(_))) => Err(err),
            Err(err) => match self {
                CrumbPolicy::Strict => match err {
                    Error::CsrfHandshake(_) => Err(err),
                    other => Err(Error::CsrfHandshake(other.to_string())),
                },
                CrumbPolicy::Lenient => {
                    warn!(error = %err, "Crumb fetch failed, sending request without crumb");
                    Ok(None)
                }
            },
        }
    }

    /// Wire form of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            CrumbPolicy::Lenient => "lenient",
            CrumbPolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for CrumbPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrumbPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(CrumbPolicy::Lenient),
            "strict" => Ok(CrumbPolicy::Strict),
            other => Err(Error::Config(format!(
                "unknown crumb policy '{}', expected 'lenient' or 'strict'",
                other
            ))),
        }
    }
}
