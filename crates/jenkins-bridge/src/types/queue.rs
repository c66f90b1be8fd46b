//! Build queue types

use super::build::BuildReference;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A pending build admission.
///
/// Exists from the moment a build is requested until the server either starts
/// it (`executable` is then set and the item leaves the queue) or the item is
/// cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    /// Server-assigned queue id
    pub id: u64,
    /// Job the item will build
    pub job_name: String,
    /// Why the item is still waiting
    #[serde(default)]
    pub why: String,
    /// Blocked by another build or a resource
    #[serde(default)]
    pub blocked: bool,
    /// Ready to run once an executor frees up
    #[serde(default)]
    pub buildable: bool,
    /// Waiting longer than expected
    #[serde(default)]
    pub stuck: bool,
    /// Enqueue time, epoch milliseconds
    #[serde(default)]
    pub in_queue_since: i64,
    /// Build parameters, empty when none
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    /// Cancelled before starting
    #[serde(default)]
    pub cancelled: bool,
    /// The build this item turned into, once started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<BuildReference>,
}

impl QueueItem {
    /// Whether the item has left the queue by starting a build.
    pub fn is_started(&self) -> bool {
        self.executable.is_some()
    }
}
