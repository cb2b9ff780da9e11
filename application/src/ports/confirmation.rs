//! Confirmation port for mutating tool calls.
//!
//! # Architecture
//!
//! - **Port**: [`ConfirmationPort`] - defined here in application layer
//! - **Adapter**: `InteractiveConfirmation` - implemented in presentation layer
//!
//! # Flow
//!
//! ```text
//! LLM proposes write_file(...)
//!        ↓
//! registry lookup + schema validation
//!        ↓
//! side effect == mutating?
//!        ↓ yes
//! ConfirmationPort::confirm()   (blocks until the user answers)
//!        ↓
//! Accept → execute    Reject → USER_REJECTED result
//! ```
//!
//! # Built-in Implementations
//!
//! The gate installs these for the non-interactive confirmation modes:
//!
//! - [`AutoRejectConfirmation`] - Always returns `Decision::Reject` (`auto_reject`)
//! - [`AutoApproveConfirmation`] - Always returns `Decision::Accept` (`auto_approve`)

use async_trait::async_trait;
use severino_domain::{Decision, ToolCall, ToolDefinition};
use thiserror::Error;

/// Failure to obtain a decision. A rejection is a [`Decision`], not an error.
#[derive(Error, Debug, Clone)]
pub enum ConfirmationError {
    /// User aborted the prompt (e.g., Ctrl+C).
    #[error("Confirmation cancelled")]
    Cancelled,
    /// Terminal read or write failure.
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Source of accept/reject decisions for mutating tool calls.
///
/// `confirm` renders the call and suspends until a decision exists.
/// There is no timeout.
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    async fn confirm(
        &self,
        call: &ToolCall,
        definition: &ToolDefinition,
    ) -> Result<Decision, ConfirmationError>;
}

/// Declines every call.
pub struct AutoRejectConfirmation;

#[async_trait]
impl ConfirmationPort for AutoRejectConfirmation {
    async fn confirm(
        &self,
        _call: &ToolCall,
        _definition: &ToolDefinition,
    ) -> Result<Decision, ConfirmationError> {
        Ok(Decision::Reject)
    }
}

/// Accepts every call.
pub struct AutoApproveConfirmation;

#[async_trait]
impl ConfirmationPort for AutoApproveConfirmation {
    async fn confirm(
        &self,
        _call: &ToolCall,
        _definition: &ToolDefinition,
    ) -> Result<Decision, ConfirmationError> {
        Ok(Decision::Accept)
    }
}
