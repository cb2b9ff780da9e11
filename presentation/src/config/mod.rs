//! Presentation-level configuration
//!
//! REPL behavior, filled in by the binary from the `[repl]` config section.

use std::path::PathBuf;

/// REPL configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Show the spinner and per-tool progress lines
    pub show_progress: bool,
    /// Line-editor history; `None` keeps history in memory only
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}
