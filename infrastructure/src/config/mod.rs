//! Configuration file loading for severino
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SEVERINO_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./severino.toml` or `./.severino.toml`
//! 4. Global: `<config_dir>/severino/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_GEMINI_KEY_ENV, DEFAULT_GEMINI_URL, DEFAULT_OLLAMA_URL, FileAgentConfig, FileConfig,
    FileGeminiConfig, FileLoggingConfig, FileOllamaConfig, FileProviderConfig, FileReplConfig,
    FileToolsConfig, expand_home,
};
pub use loader::ConfigLoader;
