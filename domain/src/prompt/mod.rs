//! Prompt domain

pub mod system;

pub use system::{SEVERINO_PERSONA, SystemPrompt};
