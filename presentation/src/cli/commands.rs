//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use severino_domain::{ConfirmationMode, ProviderKind};
use std::path::PathBuf;

/// LLM backend selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// Local Ollama server
    Ollama,
    /// Google Gemini API
    Gemini,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Ollama => ProviderKind::Ollama,
            ProviderArg::Gemini => ProviderKind::Gemini,
        }
    }
}

/// How mutating tool calls are confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfirmArg {
    /// Ask on the terminal for every mutating call
    Interactive,
    /// Reject every mutating call (dry run)
    AutoReject,
    /// Run mutating calls without asking
    AutoApprove,
}

impl From<ConfirmArg> for ConfirmationMode {
    fn from(arg: ConfirmArg) -> Self {
        match arg {
            ConfirmArg::Interactive => ConfirmationMode::Interactive,
            ConfirmArg::AutoReject => ConfirmationMode::AutoReject,
            ConfirmArg::AutoApprove => ConfirmationMode::AutoApprove,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run one prompt and print the answer
    Ask {
        /// The request for the agent
        prompt: String,
    },
    /// Start an interactive session
    Chat,
    /// List the available tools
    Tools,
}

/// CLI arguments for severino
#[derive(Parser, Debug)]
#[command(name = "severino")]
#[command(author, version, about = "Terminal agent that proposes tools and asks before it changes anything")]
#[command(long_about = r#"
Severino is a software-engineering assistant for the terminal.

Each request is sent to an LLM backend (local Ollama or Gemini) which
answers directly or proposes one tool call at a time. Read-only tools run
immediately; tools that write files or run commands are shown to you first
and only run once you accept them.

Configuration files are loaded from (in priority order):
1. SEVERINO_* environment variables (e.g. SEVERINO_PROVIDER__KIND=gemini)
2. --config <path>      Explicit config file
3. ./severino.toml      Project-level config
4. ~/.config/severino/config.toml   Global config

Example:
  severino ask "Summarize what src/main.rs does"
  severino --provider gemini chat
  severino --confirm auto-reject ask "Clean up the build directory"
"#)]
pub struct Cli {
    /// Omitted: start a chat session
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// LLM backend
    #[arg(long, value_enum, global = true)]
    pub provider: Option<ProviderArg>,

    /// Model name (default depends on the backend)
    #[arg(short, long, value_name = "MODEL", global = true)]
    pub model: Option<String>,

    /// Maximum tokens per response
    #[arg(long, value_name = "N", global = true)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(long, value_name = "T", global = true)]
    pub temperature: Option<f32>,

    /// Confirmation mode for mutating tools
    #[arg(long = "confirm", value_enum, value_name = "MODE", global = true)]
    pub confirm: Option<ConfirmArg>,

    /// Base directory for relative tool paths
    #[arg(long, value_name = "DIR", global = true)]
    pub working_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_flags() {
        let cli = Cli::parse_from([
            "severino",
            "-vv",
            "--provider",
            "gemini",
            "--confirm",
            "auto-reject",
            "ask",
            "list the files",
        ]);

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.provider.map(ProviderKind::from), Some(ProviderKind::Gemini));
        assert_eq!(
            cli.confirm.map(ConfirmationMode::from),
            Some(ConfirmationMode::AutoReject)
        );
        assert_eq!(
            cli.command,
            Some(Command::Ask {
                prompt: "list the files".to_string()
            })
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["severino", "chat", "--model", "llama3.1", "-q"]);
        assert_eq!(cli.command, Some(Command::Chat));
        assert_eq!(cli.model.as_deref(), Some("llama3.1"));
        assert!(cli.quiet);
    }

    #[test]
    fn test_show_config_without_subcommand() {
        let cli = Cli::parse_from(["severino", "--show-config"]);
        assert!(cli.show_config);
        assert!(cli.command.is_none());
        assert!(Cli::try_parse_from(["severino", "ask"]).is_err());
    }
}
