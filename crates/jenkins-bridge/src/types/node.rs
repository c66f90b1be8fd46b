use serde::{Deserialize, Serialize};

/// A build agent (the controller itself included).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Display name (`Built-In Node`, `linux-agent-1`, …)
    pub display_name: String,
    /// Not connected or not accepting work
    #[serde(default)]
    pub offline: bool,
    /// Taken offline on purpose by an administrator
    #[serde(default)]
    pub temporarily_offline: bool,
    /// Number of executors
    #[serde(default)]
    pub num_executors: u32,
    /// No executor is busy
    #[serde(default)]
    pub idle: bool,
}

impl Node {
    /// Whether the node can accept work.
    pub fn is_available(&self) -> bool {
        !self.offline && !self.temporarily_offline && self.num_executors > 0
    }
}
