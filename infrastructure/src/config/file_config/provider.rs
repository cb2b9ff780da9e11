//! Backend configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};
use severino_domain::{ConfigIssue, ConfigIssueCode, ProviderKind};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

/// Raw provider configuration from TOML
///
/// # Example
///
/// ```toml
/// [provider]
/// kind = "gemini"            # "ollama" (local) or "gemini" (cloud)
/// model = "gemini-1.5-pro"   # omitted: the backend's default model
/// max_tokens = 1024
/// temperature = 0.7
///
/// [provider.gemini]
/// api_key_env = "GEMINI_API_KEY"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub kind: String,
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    pub ollama: FileOllamaConfig,
    pub gemini: FileGeminiConfig,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            kind: "ollama".to_string(),
            model: None,
            max_tokens: 1024,
            temperature: 0.7,
            timeout_secs: 120,
            ollama: FileOllamaConfig::default(),
            gemini: FileGeminiConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    pub base_url: String,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Inline key; takes precedence over `api_key_env`
    pub api_key: Option<String>,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_URL.to_string(),
            api_key_env: DEFAULT_GEMINI_KEY_ENV.to_string(),
            api_key: None,
        }
    }
}

impl FileGeminiConfig {
    /// The inline key, or the one found in `api_key_env`. Blank keys count as unset.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl FileProviderConfig {
    /// Parse `kind`, falling back to Ollama with a warning.
    pub fn parse_kind(&self) -> (ProviderKind, Vec<ConfigIssue>) {
        match self.kind.parse::<ProviderKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => (
                ProviderKind::default(),
                vec![ConfigIssue::warning(
                    ConfigIssueCode::UnknownProvider,
                    format!(
                        "provider.kind: unknown value '{}' (expected 'ollama' or 'gemini'), using 'ollama'",
                        self.kind
                    ),
                )],
            ),
        }
    }

    /// The configured model, or the default model of `kind`.
    pub fn model_for(&self, kind: ProviderKind) -> (String, Vec<ConfigIssue>) {
        match &self.model {
            Some(model) if model.trim().is_empty() => (
                kind.default_model().to_string(),
                vec![ConfigIssue::warning(
                    ConfigIssueCode::EmptyModel,
                    format!(
                        "provider.model is empty, using '{}'",
                        kind.default_model()
                    ),
                )],
            ),
            Some(model) => (model.trim().to_string(), vec![]),
            None => (kind.default_model().to_string(), vec![]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_falls_back() {
        let config = FileProviderConfig {
            kind: "bedrock".to_string(),
            ..Default::default()
        };
        let (kind, issues) = config.parse_kind();
        assert_eq!(kind, ProviderKind::Ollama);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::UnknownProvider);
    }

    #[test]
    fn test_model_defaults_per_kind() {
        let config = FileProviderConfig::default();
        assert_eq!(config.model_for(ProviderKind::Gemini).0, "gemini-1.5-pro");

        let config = FileProviderConfig {
            model: Some("  ".to_string()),
            ..Default::default()
        };
        let (model, issues) = config.model_for(ProviderKind::Ollama);
        assert_eq!(model, "gemma3");
        assert_eq!(issues[0].code, ConfigIssueCode::EmptyModel);
    }

    #[test]
    fn test_inline_api_key_wins() {
        let config = FileGeminiConfig {
            api_key: Some("inline".to_string()),
            api_key_env: "SEVERINO_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("inline"));

        let config = FileGeminiConfig {
            api_key: None,
            api_key_env: "SEVERINO_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert!(config.resolve_api_key().is_none());
    }
}
