//! Type definitions for the RunTurn use case.

use crate::ports::confirmation::ConfirmationError;
use crate::ports::llm_gateway::GatewayError;
use severino_domain::{DomainError, TurnState};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Reasons a turn is aborted.
///
/// Every variant is scoped to the turn: the session survives with the
/// history it had before the turn started.
#[derive(Error, Debug)]
pub enum TurnError {
    #[error("Empty input")]
    EmptyInput,

    #[error("Backend error: {0}")]
    Backend(#[from] GatewayError),

    #[error("Confirmation failed: {0}")]
    Confirmation(ConfirmationError),

    #[error("Tool round limit reached after {0} LLM calls")]
    ToolRoundLimit(usize),

    #[error("Invalid turn state: {0}")]
    InvalidState(#[from] DomainError),

    #[error("Turn cancelled")]
    Cancelled,
}

impl TurnError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TurnError::Cancelled)
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, TurnError::Backend(_))
    }
}

/// Input for one turn
#[derive(Debug, Clone)]
pub struct TurnInput {
    pub text: String,
    /// Checked before every LLM call and every tool execution
    pub cancellation: Option<CancellationToken>,
}

impl TurnInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Output of a completed turn
#[derive(Debug, Clone)]
pub struct TurnOutput {
    /// The model's final natural-language answer
    pub answer: String,
    /// Final state (always `FinalAnswer`)
    pub state: TurnState,
    /// Number of tools that actually ran during the turn
    pub executed_tools: usize,
}
