//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Enum-like fields stay strings here; the `parse_*` helpers turn them
//! into domain types and report what they could not understand.

mod agent;
mod logging;
mod provider;
mod repl;
mod tools;

pub use agent::FileAgentConfig;
pub use logging::FileLoggingConfig;
pub use provider::{
    DEFAULT_GEMINI_KEY_ENV, DEFAULT_GEMINI_URL, DEFAULT_OLLAMA_URL, FileGeminiConfig,
    FileOllamaConfig, FileProviderConfig,
};
pub use repl::FileReplConfig;
pub use tools::FileToolsConfig;

use serde::{Deserialize, Serialize};
use severino_domain::{ConfigIssue, ConfigIssueCode, ProviderKind};
use std::path::PathBuf;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// LLM backend selection
    pub provider: FileProviderConfig,
    /// Turn loop settings
    pub agent: FileAgentConfig,
    /// Built-in tool limits
    pub tools: FileToolsConfig,
    pub logging: FileLoggingConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Unknown enum values and empty model names are warnings (a fallback
    /// is used). A zero round limit and a cloud backend without an API
    /// key are errors.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let (kind, kind_issues) = self.provider.parse_kind();
        issues.extend(kind_issues);
        issues.extend(self.provider.model_for(kind).1);
        issues.extend(self.agent.parse_confirmation().1);
        issues.extend(self.agent.check_rounds());

        if kind == ProviderKind::Gemini && self.provider.gemini.resolve_api_key().is_none() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingApiKey,
                format!(
                    "provider.kind = 'gemini' but no API key found (set {} or provider.gemini.api_key)",
                    self.provider.gemini.api_key_env
                ),
            ));
        }

        issues
    }

    /// Base directory for tool paths: `agent.working_dir` or the current directory.
    pub fn working_dir(&self) -> PathBuf {
        match self.agent.working_dir.as_deref() {
            Some(dir) if !dir.is_empty() => expand_home(dir),
            _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use severino_domain::ConfirmationMode;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[provider]
kind = "gemini"
model = "gemini-1.5-flash"
max_tokens = 2048
temperature = 0.2

[provider.gemini]
api_key = "test-key"

[agent]
confirmation = "auto-reject"
max_tool_rounds = 10
working_dir = "/srv/app"

[tools]
shell_timeout_secs = 5
enable_search = false

[logging]
transcript_dir = "/tmp/severino"

[repl]
show_progress = false
history_file = "/tmp/history.txt"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.parse_kind().0, ProviderKind::Gemini);
        assert_eq!(config.provider.model.as_deref(), Some("gemini-1.5-flash"));
        assert_eq!(config.provider.max_tokens, 2048);
        assert_eq!(
            config.provider.gemini.base_url,
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(config.agent.parse_confirmation().0, ConfirmationMode::AutoReject);
        assert_eq!(config.agent.max_tool_rounds, 10);
        assert_eq!(config.working_dir(), PathBuf::from("/srv/app"));
        assert_eq!(config.tools.shell_timeout_secs, 5);
        assert!(!config.tools.enable_search);
        assert!(!config.repl.show_progress);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[provider]
model = "llama3.1"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.parse_kind().0, ProviderKind::Ollama);
        assert_eq!(config.provider.ollama.base_url, "http://localhost:11434");
        assert_eq!(config.agent.max_tool_rounds, 25);
        assert!(config.tools.enable_search);
        assert!(config.repl.show_progress);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_issues() {
        let mut config = FileConfig::default();
        config.provider.kind = "gemini".to_string();
        config.provider.gemini.api_key_env = "SEVERINO_TEST_NO_SUCH_VAR".to_string();
        config.agent.confirmation = "sometimes".to_string();
        config.agent.max_tool_rounds = 0;

        let issues = config.validate();
        let codes: Vec<_> = issues.iter().map(|i| i.code).collect();
        assert!(codes.contains(&ConfigIssueCode::MissingApiKey));
        assert!(codes.contains(&ConfigIssueCode::UnknownConfirmationMode));
        assert!(codes.contains(&ConfigIssueCode::ZeroToolRounds));
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 2);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/x"), home.join("x"));
        }
    }
}
