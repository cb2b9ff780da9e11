//! Turn progress port.
//!
//! [`TurnProgressNotifier`] is an **output port** the presentation layer
//! implements to show what a turn is doing. All methods default to no-ops.

use severino_domain::{Decision, ToolCall, ToolResult};

pub trait TurnProgressNotifier: Send + Sync {
    /// An LLM call is about to start (`round` is 1-based).
    fn on_routing(&self, _round: usize) {}

    /// The LLM call returned.
    fn on_routing_done(&self) {}

    /// The model proposed a tool call.
    fn on_proposal(&self, _call: &ToolCall) {}

    /// The gate recorded a decision for a mutating call.
    fn on_decision(&self, _call: &ToolCall, _decision: Decision) {}

    /// A tool is about to run.
    fn on_tool_start(&self, _call: &ToolCall) {}

    /// A proposal finished, whether it ran or not.
    fn on_tool_result(&self, _result: &ToolResult) {}

    /// The model answered in plain text.
    fn on_final_answer(&self, _text: &str) {}

    /// The turn was aborted.
    fn on_turn_error(&self, _message: &str) {}
}

/// Silent notifier for tests and `--quiet`.
pub struct NoTurnProgress;

impl TurnProgressNotifier for NoTurnProgress {}
