//! Intent router: one LLM call, one outcome.

use super::types::TurnError;
use crate::ports::llm_gateway::{GatewayError, GenerateRequest, LlmGateway};
use severino_domain::{LlmResponse, ToolCall, Turn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// What the model wants to do next.
///
/// Never both: text sent alongside a tool call is kept as the call's
/// `reasoning`.
#[derive(Debug, Clone, PartialEq)]
pub enum RouterOutcome {
    FinalAnswer(String),
    Proposal(ToolCall),
}

/// Sends the session history to the backend and classifies the reply.
pub struct IntentRouter {
    gateway: Arc<dyn LlmGateway>,
    system_prompt: String,
    tools: Vec<serde_json::Value>,
}

impl IntentRouter {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        system_prompt: impl Into<String>,
        tools: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            gateway,
            system_prompt: system_prompt.into(),
            tools,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Route the full history; its last entry is the newest input.
    ///
    /// A cancelled token drops the in-flight backend request.
    pub async fn route(
        &self,
        history: &[Turn],
        cancellation: Option<&CancellationToken>,
    ) -> Result<RouterOutcome, TurnError> {
        let request = GenerateRequest {
            system_prompt: &self.system_prompt,
            history,
            tools: &self.tools,
        };

        debug!(
            provider = self.gateway.provider(),
            model = self.gateway.model(),
            turns = history.len(),
            "Routing intent"
        );

        let response = match cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(TurnError::Cancelled),
                    response = self.gateway.generate(request) => response?,
                }
            }
            None => self.gateway.generate(request).await?,
        };

        Ok(Self::interpret(response)?)
    }

    /// Classify a backend response.
    ///
    /// Only the first tool call is kept; the rest are dropped with a warning.
    pub fn interpret(response: LlmResponse) -> Result<RouterOutcome, GatewayError> {
        let text = response.text_content();
        let mut calls = response.tool_calls().into_iter();

        let Some(mut call) = calls.next() else {
            if text.is_empty() {
                return Err(GatewayError::MalformedResponse(
                    "response contained neither text nor a tool call".to_string(),
                ));
            }
            return Ok(RouterOutcome::FinalAnswer(text));
        };

        let dropped = calls.count();
        if dropped > 0 {
            warn!(
                tool = %call.tool_name,
                dropped,
                "Backend proposed several tool calls; only the first is executed"
            );
        }

        if call.tool_name.trim().is_empty() {
            return Err(GatewayError::MalformedResponse(
                "tool call without a name".to_string(),
            ));
        }

        if !text.is_empty() && call.reasoning.is_none() {
            call.reasoning = Some(text);
        }
        Ok(RouterOutcome::Proposal(call))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use severino_domain::{ContentBlock, StopReason};

    fn tool_use(name: &str, path: &str) -> ContentBlock {
        ContentBlock::ToolUse {
            id: None,
            name: name.to_string(),
            input: [("path".to_string(), json!(path))].into_iter().collect(),
        }
    }

    fn response(content: Vec<ContentBlock>) -> LlmResponse {
        LlmResponse {
            content,
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    #[test]
    fn test_text_is_final_answer() {
        let outcome = IntentRouter::interpret(LlmResponse::from_text("All done.")).unwrap();
        assert_eq!(outcome, RouterOutcome::FinalAnswer("All done.".to_string()));
    }

    #[test]
    fn test_text_with_call_is_proposal_not_answer() {
        let outcome = IntentRouter::interpret(response(vec![
            ContentBlock::Text("I'll read it first.".to_string()),
            tool_use("read_file", "/tmp/a.txt"),
        ]))
        .unwrap();

        match outcome {
            RouterOutcome::Proposal(call) => {
                assert_eq!(call.tool_name, "read_file");
                assert_eq!(call.reasoning.as_deref(), Some("I'll read it first."));
            }
            other => panic!("expected proposal, got {:?}", other),
        }
    }

    #[test]
    fn test_only_first_call_kept() {
        let outcome = IntentRouter::interpret(response(vec![
            tool_use("read_file", "/tmp/a.txt"),
            tool_use("read_file", "/tmp/b.txt"),
        ]))
        .unwrap();

        let RouterOutcome::Proposal(call) = outcome else {
            panic!("expected proposal");
        };
        assert_eq!(call.get_str("path"), Some("/tmp/a.txt"));
    }

    #[test]
    fn test_empty_response_is_malformed() {
        let err = IntentRouter::interpret(response(vec![ContentBlock::Text("  ".into())]))
            .unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
    }
}
