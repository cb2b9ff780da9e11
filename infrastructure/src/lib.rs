//! Infrastructure layer for severino
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the built-in tools and their registry,
//! the Ollama and Gemini gateways, configuration file loading and the
//! JSONL transcript writer.

pub mod config;
pub mod logging;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use logging::JsonlConversationLogger;
pub use providers::{GeminiGateway, GenerationOptions, OllamaGateway, build_gateway};
pub use tools::{
    JsonSchemaToolConverter, RegistryError, ToolRegistry, ToolSettings, builtin_tools,
    default_registry,
};
