//! Turn lifecycle: the phase machine and confirmation decisions.

pub mod decision;
pub mod state;

pub use decision::{ConfirmationMode, Decision};
pub use state::{TurnPhase, TurnState};
