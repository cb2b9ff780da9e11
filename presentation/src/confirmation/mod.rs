//! Confirmation prompt adapter.

mod interactive;

pub use interactive::{InteractiveConfirmation, parse_answer, read_decision};
