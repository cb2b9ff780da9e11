//! Limits and working directory shared by the built-in tools.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout for `run_shell_command`
pub const DEFAULT_SHELL_TIMEOUT_SECS: u64 = 60;

/// Maximum file size `read_file` will load (10 MB)
pub const DEFAULT_MAX_READ_BYTES: u64 = 10 * 1024 * 1024;

/// Maximum combined stdout/stderr kept from a command (1 MB)
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ToolSettings {
    /// Relative paths in tool arguments resolve against this directory
    pub working_dir: PathBuf,
    pub shell_timeout: Duration,
    pub max_read_bytes: u64,
    pub max_output_bytes: usize,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            shell_timeout: Duration::from_secs(DEFAULT_SHELL_TIMEOUT_SECS),
            max_read_bytes: DEFAULT_MAX_READ_BYTES,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

impl ToolSettings {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_shell_timeout(mut self, timeout: Duration) -> Self {
        self.shell_timeout = timeout;
        self
    }

    pub fn with_max_read_bytes(mut self, max: u64) -> Self {
        self.max_read_bytes = max;
        self
    }

    pub fn with_max_output_bytes(mut self, max: usize) -> Self {
        self.max_output_bytes = max;
        self
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.working_dir.join(candidate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_absolute() {
        let settings = ToolSettings::new("/work");
        assert_eq!(settings.resolve("src/lib.rs"), PathBuf::from("/work/src/lib.rs"));
        assert_eq!(settings.resolve("/etc/hosts"), PathBuf::from("/etc/hosts"));
    }
}
