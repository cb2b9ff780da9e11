//! Port for the structured conversation transcript.
//!
//! Separate from `tracing` diagnostics: this records every turn event as
//! a machine-readable record (one JSONL line per event in the file adapter).

use serde_json::Value;

/// Event type identifiers written by the turn use case.
pub mod events {
    pub const USER_INPUT: &str = "user_input";
    pub const LLM_RESPONSE: &str = "llm_response";
    pub const TOOL_PROPOSAL: &str = "tool_proposal";
    pub const CONFIRMATION: &str = "confirmation";
    pub const TOOL_RESULT: &str = "tool_result";
    pub const TURN_ERROR: &str = "turn_error";
}

pub struct ConversationEvent {
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Synchronous and infallible; a failed write must not disturb the turn.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when the transcript is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
