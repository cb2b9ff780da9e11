//! Session domain.
//!
//! - [`entities::Session`] - ordered conversation history of one run
//! - [`entities::Turn`] - user input, agent text or a tool invocation record
//! - [`response::LlmResponse`] - what a backend returns for one call

pub mod entities;
pub mod response;

pub use entities::{Checkpoint, Role, Session, ToolInvocation, Turn};
pub use response::{ContentBlock, LlmResponse, StopReason};
