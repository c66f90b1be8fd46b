use serde::{Deserialize, Serialize};

/// Controller health summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    /// Version from the `X-Jenkins` response header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Controller mode (`NORMAL` or `EXCLUSIVE`)
    #[serde(default)]
    pub mode: String,
    /// Preparing for shutdown; new builds are not started
    #[serde(default)]
    pub quieting_down: bool,
    /// Security realm enabled
    #[serde(default)]
    pub use_security: bool,
}

impl ServerInfo {
    /// Whether the controller is accepting new builds.
    pub fn is_accepting_builds(&self) -> bool {
        !self.quieting_down
    }
}
