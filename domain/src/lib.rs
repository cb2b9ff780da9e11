//! Domain layer for severino
//!
//! Entities, value objects and pure rules of the tool-orchestration loop.
//! No I/O, no async runtime.
//!
//! # Core Concepts
//!
//! - **Tool**: a named capability with a parameter schema and a side-effect
//!   class. Mutating tools need an explicit confirmation; read-only tools never do.
//! - **Proposal** ([`ToolCall`]): a tool name plus arguments suggested by the model.
//! - **Session**: the ordered history of user input, agent text and tool invocations.
//! - **Turn**: one user input driven through [`TurnState`] until a final answer.

pub mod config;
pub mod core;
pub mod prompt;
pub mod session;
pub mod tool;
pub mod turn;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, ProviderKind, Severity};
pub use crate::core::error::DomainError;
pub use prompt::{SEVERINO_PERSONA, SystemPrompt};
pub use session::{
    Checkpoint, ContentBlock, LlmResponse, Role, Session, StopReason, ToolInvocation, Turn,
};
pub use tool::{
    DefaultToolValidator, ErrorCode, ParamType, SideEffect, Tool, ToolCall, ToolDefinition,
    ToolError, ToolParameter, ToolResult, ToolResultMetadata, ToolValidator, ValidationError,
};
pub use turn::{ConfirmationMode, Decision, TurnPhase, TurnState};
