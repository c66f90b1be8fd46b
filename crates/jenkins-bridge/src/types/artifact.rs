use serde::{Deserialize, Serialize};

/// A file archived by a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// File name without directories
    pub file_name: String,
    /// Path relative to the build's artifact root
    pub relative_path: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
}
