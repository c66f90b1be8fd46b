//! Job types

use super::build::BuildReference;
use serde::{Deserialize, Serialize};

/// Summary of a job as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Job name, case-sensitive
    pub name: String,
    /// Job URL
    pub url: String,
    /// Description, empty when unset
    #[serde(default)]
    pub description: String,
    /// Whether the job accepts new builds
    #[serde(default)]
    pub buildable: bool,
    /// Whether a build of the job is waiting in the queue
    #[serde(default)]
    pub in_queue: bool,
    /// Status color token (`blue`, `red_anime`, `disabled`, …), empty for folders
    #[serde(default)]
    pub color: String,
}

/// A build parameter declared by a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobParameter {
    /// Parameter name
    pub name: String,
    /// Server type tag, e.g. `StringParameterDefinition`
    #[serde(rename = "type")]
    pub param_type: String,
    /// Default value in its JSON form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    /// Description, empty when unset
    #[serde(default)]
    pub description: String,
    /// Allowed values of a choice parameter
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

/// Detailed view of one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    /// Summary fields
    #[serde(flatten)]
    pub job: Job,
    /// Most recent build
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_build: Option<BuildReference>,
    /// Most recent successful build
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_successful_build: Option<BuildReference>,
    /// Most recent failed build
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failed_build: Option<BuildReference>,
    /// Declared parameters; empty when the job takes none
    #[serde(default)]
    pub parameters: Vec<JobParameter>,
    /// Whether the job is disabled
    #[serde(default)]
    pub disabled: bool,
}

impl JobDetails {
    /// Look up a declared parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&JobParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Whether the job declares any parameters.
    pub fn is_parameterized(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// First supplied name that the job does not declare.
    pub fn first_unknown_parameter<'a, I>(&self, names: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a String>,
    {
        names
            .into_iter()
            .map(String::as_str)
            .find(|name| self.parameter(name).is_none())
    }
}
