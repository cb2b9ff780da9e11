//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation
//! adapters implement.

pub mod confirmation;
pub mod conversation_logger;
pub mod llm_gateway;
pub mod tool_executor;
pub mod tool_schema;
pub mod turn_progress;
