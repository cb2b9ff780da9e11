//! Domain error types

use crate::turn::state::TurnPhase;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Empty input")]
    EmptyInput,

    #[error("Invalid turn transition: {from} -> {to}")]
    InvalidTransition { from: TurnPhase, to: TurnPhase },

    #[error("Invalid confirmation mode: {0}")]
    InvalidConfirmationMode(String),

    #[error("Invalid provider: {0}")]
    InvalidProvider(String),
}
