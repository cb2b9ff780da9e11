//! Tool domain module
//!
//! How the agent touches the local machine. Every tool is described by a
//! [`ToolDefinition`] (name, parameter schema, side-effect class), invoked
//! through a [`ToolCall`], and answers with a [`ToolResult`].
//!
//! ```text
//! ┌────────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolDefinition │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registration) │    │ (proposal)   │    │ (outcome)    │
//! └────────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! # Side effects
//!
//! | Class | Examples | Confirmation |
//! |-------|----------|--------------|
//! | **read-only** | `read_file`, `list_directory`, `glob_search`, `grep_search` | never |
//! | **mutating** | `write_file`, `run_shell_command` | exactly once, before execution |
//!
//! # Layers
//!
//! - **Domain** (this module): definitions, validation, the [`Tool`] trait
//! - **Application** (`ToolExecutorPort`): lookup and execution port
//! - **Infrastructure** (`ToolRegistry` and the built-in tools): file I/O and process spawning

pub mod entities;
pub mod traits;
pub mod validation;
pub mod value_objects;

pub use entities::{ParamType, SideEffect, ToolCall, ToolDefinition, ToolParameter};
pub use traits::Tool;
pub use validation::{DefaultToolValidator, ToolValidator, ValidationError};
pub use value_objects::{ErrorCode, ToolError, ToolResult, ToolResultMetadata};
