//! Application layer for severino
//!
//! This crate contains the turn use case, its port definitions and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::TurnParams;
pub use ports::{
    confirmation::{
        AutoApproveConfirmation, AutoRejectConfirmation, ConfirmationError, ConfirmationPort,
    },
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, GenerateRequest, LlmGateway},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
    turn_progress::{NoTurnProgress, TurnProgressNotifier},
};
pub use use_cases::run_turn::{
    ConfirmationGate, IntentRouter, RouterOutcome, RunTurnUseCase, TurnError, TurnInput,
    TurnOutput,
};
pub use use_cases::tool_helpers::tool_args_preview;
