//! Local session state configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Local session state configuration.
///
/// The session state holds the bearer token and cached user records
/// between invocations, analogous to a browser's local storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// State backend: `"file"` or `"memory"`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Override for the session state file path. When unset, the state
    /// lives under the platform data directory.
    #[serde(default)]
    pub state_path: Option<PathBuf>,
}

impl SessionConfig {
    /// Resolve the path of the session state file.
    ///
    /// Falls back to `staffhub/session.json` in the current directory when
    /// no platform data directory is available.
    pub fn state_file(&self) -> PathBuf {
        if let Some(path) = &self.state_path {
            return path.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("staffhub")
            .join("session.json")
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            state_path: None,
        }
    }
}

fn default_backend() -> String {
    "file".to_string()
}
