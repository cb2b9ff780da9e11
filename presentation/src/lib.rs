//! Presentation layer for severino
//!
//! This crate contains the CLI definition, the terminal confirmation
//! prompt, progress reporting, output formatting and the chat REPL.

pub mod chat;
pub mod cli;
pub mod config;
pub mod confirmation;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplAction};
pub use cli::commands::{Cli, Command, ConfirmArg, ProviderArg};
pub use config::ReplConfig;
pub use confirmation::InteractiveConfirmation;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ConsoleProgress;
