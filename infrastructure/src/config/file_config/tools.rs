//! Tools configuration from TOML (`[tools]` section)
//!
//! ```toml
//! [tools]
//! shell_timeout_secs = 60
//! max_read_bytes = 10485760
//! enable_search = true
//! ```

use crate::tools::ToolSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Default timeout for run_shell_command
    pub shell_timeout_secs: u64,
    /// Largest file read_file will load
    pub max_read_bytes: u64,
    /// Register glob_search and grep_search
    pub enable_search: bool,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        let defaults = ToolSettings::default();
        Self {
            shell_timeout_secs: defaults.shell_timeout.as_secs(),
            max_read_bytes: defaults.max_read_bytes,
            enable_search: true,
        }
    }
}

impl FileToolsConfig {
    pub fn to_settings(&self, working_dir: PathBuf) -> ToolSettings {
        ToolSettings::new(working_dir)
            .with_shell_timeout(Duration::from_secs(self.shell_timeout_secs))
            .with_max_read_bytes(self.max_read_bytes)
    }
}
