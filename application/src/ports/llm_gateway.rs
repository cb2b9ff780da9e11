//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM backends. The turn
//! use case is agnostic to whether a gateway runs locally or remotely.

use async_trait::async_trait;
use severino_domain::{LlmResponse, Turn};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations.
///
/// Every variant aborts the current turn; none ends the session.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Backend returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Missing API key (set {0})")]
    MissingApiKey(String),

    #[error("Response blocked by the backend: {0}")]
    Blocked(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// One call to the backend.
///
/// `history` is the full ordered session; its last entry is the newest
/// input (a user message or a tool result).
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    pub system_prompt: &'a str,
    pub history: &'a [Turn],
    /// Provider-neutral JSON Schema of every registered tool
    pub tools: &'a [serde_json::Value],
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Backend name for logs and banners (e.g. "ollama").
    fn provider(&self) -> &str;

    fn model(&self) -> &str;

    async fn generate(&self, request: GenerateRequest<'_>) -> Result<LlmResponse, GatewayError>;
}
