//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// file = "~/.local/share/severino/logs/severino.log"   # "" disables the file log
/// transcript_dir = "~/.local/share/severino/transcripts"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Diagnostic log file; rotated daily
    pub file: Option<String>,
    /// Directory for JSONL conversation transcripts (off when unset)
    pub transcript_dir: Option<String>,
}

impl FileLoggingConfig {
    /// Where the diagnostic log goes, or `None` when disabled.
    pub fn log_file(&self) -> Option<PathBuf> {
        match self.file.as_deref() {
            Some("") => None,
            Some(path) => Some(super::expand_home(path)),
            None => dirs::data_dir().map(|d| d.join("severino").join("logs").join("severino.log")),
        }
    }

    pub fn transcript_dir(&self) -> Option<PathBuf> {
        self.transcript_dir
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(super::expand_home)
    }
}
