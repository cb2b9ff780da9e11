//! Agent configuration from TOML (`[agent]` section)

use serde::{Deserialize, Serialize};
use severino_domain::{ConfigIssue, ConfigIssueCode, ConfirmationMode};

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// confirmation = "interactive"   # "interactive", "auto-reject", "auto-approve"
/// max_tool_rounds = 25
/// working_dir = "~/projects/app"
/// system_prompt_file = "prompts/severino.txt"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// How mutating tool calls are confirmed
    pub confirmation: String,
    /// LLM calls allowed within one turn
    pub max_tool_rounds: usize,
    /// Base directory for relative tool paths (default: current directory)
    pub working_dir: Option<String>,
    /// Replaces the built-in persona
    pub system_prompt_file: Option<String>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            confirmation: "interactive".to_string(),
            max_tool_rounds: 25,
            working_dir: None,
            system_prompt_file: None,
        }
    }
}

impl FileAgentConfig {
    /// Parse `confirmation`, falling back to interactive with a warning.
    pub fn parse_confirmation(&self) -> (ConfirmationMode, Vec<ConfigIssue>) {
        match self.confirmation.parse::<ConfirmationMode>() {
            Ok(ConfirmationMode::AutoApprove) => (
                ConfirmationMode::AutoApprove,
                vec![ConfigIssue::warning(
                    ConfigIssueCode::AutoApproveEnabled,
                    "agent.confirmation = 'auto-approve': mutating tools run without asking",
                )],
            ),
            Ok(mode) => (mode, vec![]),
            Err(_) => (
                ConfirmationMode::Interactive,
                vec![ConfigIssue::warning(
                    ConfigIssueCode::UnknownConfirmationMode,
                    format!(
                        "agent.confirmation: unknown value '{}', using 'interactive'",
                        self.confirmation
                    ),
                )],
            ),
        }
    }

    pub fn check_rounds(&self) -> Vec<ConfigIssue> {
        if self.max_tool_rounds == 0 {
            vec![ConfigIssue::error(
                ConfigIssueCode::ZeroToolRounds,
                "agent.max_tool_rounds must be at least 1",
            )]
        } else {
            vec![]
        }
    }
}
