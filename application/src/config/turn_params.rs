//! Turn parameters for the use case loop.
//!
//! [`TurnParams`] groups the static knobs of
//! [`RunTurnUseCase`](crate::use_cases::run_turn::RunTurnUseCase).

use serde::{Deserialize, Serialize};
use severino_domain::ConfirmationMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnParams {
    /// Upper bound on LLM calls within one user turn.
    pub max_tool_rounds: usize,
    /// Who answers the confirmation gate.
    pub confirmation: ConfirmationMode,
}

impl Default for TurnParams {
    fn default() -> Self {
        Self {
            max_tool_rounds: 25,
            confirmation: ConfirmationMode::Interactive,
        }
    }
}

impl TurnParams {
    pub fn with_max_tool_rounds(mut self, max: usize) -> Self {
        self.max_tool_rounds = max;
        self
    }

    pub fn with_confirmation(mut self, mode: ConfirmationMode) -> Self {
        self.confirmation = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_ask_the_user() {
        let params = TurnParams::default();
        assert_eq!(params.confirmation, ConfirmationMode::Interactive);
        assert_eq!(params.max_tool_rounds, 25);
    }

    #[test]
    fn test_builders() {
        let params = TurnParams::default()
            .with_max_tool_rounds(3)
            .with_confirmation(ConfirmationMode::AutoReject);
        assert_eq!(params.max_tool_rounds, 3);
        assert_eq!(params.confirmation, ConfirmationMode::AutoReject);
    }
}
