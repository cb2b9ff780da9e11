//! Conversation transcript logging.
//!
//! Provides [`JsonlConversationLogger`], the file adapter for the
//! [`ConversationLogger`](severino_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
