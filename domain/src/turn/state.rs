//! Turn state machine.
//!
//! One user input moves through these phases until the model gives a
//! final answer or the turn is aborted:
//!
//! ```text
//! AwaitingInput ──> RoutingIntent ──> FinalAnswer
//!                        ▲  │
//!                        │  └──> ToolProposed ──┬──> ConfirmationPending ──> Accepted ──> Executing
//!                        │                      │              │                            │
//!                        │                      │              └──> Rejected ───────┐       │
//!                        │                      ├──> Executing (read-only)          │       ▼
//!                        │                      └──> ResultReady (unknown/invalid)  │  ResultReady
//!                        └──────────────────────────────────────────────────────────┴───────┘
//!
//! any non-terminal phase ──> Aborted
//! ```
//!
//! Illegal moves are rejected with [`DomainError::InvalidTransition`]
//! and leave the state untouched.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    AwaitingInput,
    RoutingIntent,
    ToolProposed,
    ConfirmationPending,
    Accepted,
    Rejected,
    Executing,
    ResultReady,
    FinalAnswer,
    Aborted,
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::AwaitingInput => "awaiting_input",
            TurnPhase::RoutingIntent => "routing_intent",
            TurnPhase::ToolProposed => "tool_proposed",
            TurnPhase::ConfirmationPending => "confirmation_pending",
            TurnPhase::Accepted => "accepted",
            TurnPhase::Rejected => "rejected",
            TurnPhase::Executing => "executing",
            TurnPhase::ResultReady => "result_ready",
            TurnPhase::FinalAnswer => "final_answer",
            TurnPhase::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnPhase::FinalAnswer | TurnPhase::Aborted)
    }

    /// Whether the machine may move from `self` to `next`.
    pub fn can_transition_to(&self, next: TurnPhase) -> bool {
        use TurnPhase::*;

        if next == Aborted {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (AwaitingInput, RoutingIntent)
                | (RoutingIntent, FinalAnswer)
                | (RoutingIntent, ToolProposed)
                | (ToolProposed, ConfirmationPending)
                | (ToolProposed, Executing)
                | (ToolProposed, ResultReady)
                | (ConfirmationPending, Accepted)
                | (ConfirmationPending, Rejected)
                | (Accepted, Executing)
                | (Executing, ResultReady)
                | (Rejected, RoutingIntent)
                | (ResultReady, RoutingIntent)
        )
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current phase of one turn plus how many times it re-entered routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    phase: TurnPhase,
    routing_rounds: usize,
    tool_calls: usize,
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            phase: TurnPhase::AwaitingInput,
            routing_rounds: 0,
            tool_calls: 0,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Number of times the turn entered `RoutingIntent` (one per LLM call).
    pub fn routing_rounds(&self) -> usize {
        self.routing_rounds
    }

    /// Number of proposals seen in this turn.
    pub fn tool_calls(&self) -> usize {
        self.tool_calls
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn transition(&mut self, next: TurnPhase) -> Result<(), DomainError> {
        if !self.phase.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        match next {
            TurnPhase::RoutingIntent => self.routing_rounds += 1,
            TurnPhase::ToolProposed => self.tool_calls += 1,
            _ => {}
        }
        self.phase = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TurnPhase::*;

    fn walk(state: &mut TurnState, phases: &[TurnPhase]) {
        for phase in phases {
            state.transition(*phase).unwrap();
        }
    }

    #[test]
    fn test_final_answer_without_tools() {
        let mut state = TurnState::new();
        walk(&mut state, &[RoutingIntent, FinalAnswer]);
        assert!(state.is_finished());
        assert_eq!(state.routing_rounds(), 1);
        assert_eq!(state.tool_calls(), 0);
    }

    #[test]
    fn test_mutating_path_through_gate() {
        let mut state = TurnState::new();
        walk(
            &mut state,
            &[
                RoutingIntent,
                ToolProposed,
                ConfirmationPending,
                Accepted,
                Executing,
                ResultReady,
                RoutingIntent,
                FinalAnswer,
            ],
        );
        assert_eq!(state.routing_rounds(), 2);
        assert_eq!(state.tool_calls(), 1);
    }

    #[test]
    fn test_rejection_loops_back_to_routing() {
        let mut state = TurnState::new();
        walk(
            &mut state,
            &[RoutingIntent, ToolProposed, ConfirmationPending, Rejected, RoutingIntent],
        );
        assert_eq!(state.phase(), RoutingIntent);
    }

    #[test]
    fn test_cannot_execute_while_confirmation_pending() {
        let mut state = TurnState::new();
        walk(&mut state, &[RoutingIntent, ToolProposed, ConfirmationPending]);

        let err = state.transition(Executing).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                from: ConfirmationPending,
                to: Executing
            }
        );
        assert_eq!(state.phase(), ConfirmationPending);
    }

    #[test]
    fn test_rejected_never_reaches_executing() {
        assert!(!Rejected.can_transition_to(Executing));
        assert!(!Rejected.can_transition_to(ResultReady));
    }

    #[test]
    fn test_abort_only_from_live_phases() {
        let mut state = TurnState::new();
        walk(&mut state, &[RoutingIntent, Aborted]);
        assert!(state.is_finished());
        assert!(state.transition(Aborted).is_err());
        assert!(!FinalAnswer.can_transition_to(Aborted));
    }
}
