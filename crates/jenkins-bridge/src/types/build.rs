//! Build types

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal outcome of a build.
///
/// Serialized in the server's SCREAMING_SNAKE_CASE form. Tokens this client
/// does not know are preserved in [`BuildResult::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildResult {
    /// `SUCCESS`
    Success,
    /// `UNSTABLE`
    Unstable,
    /// `FAILURE`
    Failure,
    /// `NOT_BUILT`
    NotBuilt,
    /// `ABORTED`
    Aborted,
    /// Any other token
    Other(String),
}

impl BuildResult {
    /// Wire form of the result.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "SUCCESS",
            Self::Unstable => "UNSTABLE",
            Self::Failure => "FAILURE",
            Self::NotBuilt => "NOT_BUILT",
            Self::Aborted => "ABORTED",
            Self::Other(token) => token,
        }
    }
}

impl From<String> for BuildResult {
    fn from(token: String) -> Self {
        match token.as_str() {
            "SUCCESS" => Self::Success,
            "UNSTABLE" => Self::Unstable,
            "FAILURE" => Self::Failure,
            "NOT_BUILT" => Self::NotBuilt,
            "ABORTED" => Self::Aborted,
            _ => Self::Other(token),
        }
    }
}

impl From<BuildResult> for String {
    fn from(result: BuildResult) -> Self {
        match result {
            BuildResult::Other(token) => token,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(number, url)` pointer to a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReference {
    /// Build number
    pub number: u32,
    /// Build URL
    pub url: String,
}

/// One execution of a job.
///
/// While `building` is true `result` is `None`; once the build finishes the
/// result is set and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    /// Build number, positive and increasing per job
    pub number: u32,
    /// Build URL
    pub url: String,
    /// Terminal result, absent while running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<BuildResult>,
    /// Whether the build is running
    pub building: bool,
    /// Duration in milliseconds (0 while running)
    pub duration: i64,
    /// Start time, epoch milliseconds
    pub timestamp: i64,
    /// Executor label, when the build occupies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,
    /// Estimated duration in milliseconds (-1 when unknown)
    pub estimated_duration: i64,
}

impl Build {
    /// Whether the build has finished.
    pub fn is_terminal(&self) -> bool {
        !self.building
    }

    /// Start time as a UTC datetime.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// Whether the build finished with `result`.
    pub fn finished_as(&self, result: &BuildResult) -> bool {
        !self.building && self.result.as_ref() == Some(result)
    }
}

/// A build in progress, found by scanning every job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningBuild {
    /// Job the build belongs to
    pub job_name: String,
    /// Build number
    pub build_number: u32,
    /// Build URL
    pub url: String,
    /// Start time, epoch milliseconds
    pub timestamp: i64,
    /// Estimated duration in milliseconds
    pub estimated_duration: i64,
    /// Executor label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,
}

impl RunningBuild {
    /// Project a running build of `job_name`.
    pub fn from_build(job_name: impl Into<String>, build: Build) -> Self {
        Self {
            job_name: job_name.into(),
            build_number: build.number,
            url: build.url,
            timestamp: build.timestamp,
            estimated_duration: build.estimated_duration,
            executor: build.executor,
        }
    }
}
