//! LLM backend selection

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which LLM backend serves the intent router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local inference through an Ollama server
    #[default]
    Ollama,
    /// Google Gemini API
    Gemini,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "ollama",
            ProviderKind::Gemini => "gemini",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ProviderKind::Ollama)
    }

    /// Model used when none is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "gemma3",
            ProviderKind::Gemini => "gemini-1.5-pro",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" | "local" => Ok(ProviderKind::Ollama),
            "gemini" | "cloud" => Ok(ProviderKind::Gemini),
            _ => Err(DomainError::InvalidProvider(s.to_string())),
        }
    }
}
