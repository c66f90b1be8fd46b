//! View types

use super::job::Job;
use serde::{Deserialize, Serialize};

/// A named grouping of jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    /// View name
    pub name: String,
    /// View URL
    pub url: String,
    /// Description, empty when unset
    #[serde(default)]
    pub description: String,
}

/// A view with the jobs it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDetails {
    /// View summary
    #[serde(flatten)]
    pub view: View,
    /// Jobs in the view; empty when none
    #[serde(default)]
    pub jobs: Vec<Job>,
}
