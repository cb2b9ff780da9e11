//! Structured LLM responses.
//!
//! Backends answer with a list of content blocks mixing text and tool
//! use requests. The router decides what a response means for the turn;
//! this module only models its shape.

use crate::tool::entities::ToolCall;
use serde_json::Value;
use std::collections::BTreeMap;

/// A single block of content within an LLM response.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    ToolUse {
        /// Backend-assigned id, when the backend has one
        id: Option<String>,
        name: String,
        input: BTreeMap<String, Value>,
    },
}

impl ContentBlock {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_tool_use(&self) -> bool {
        matches!(self, ContentBlock::ToolUse { .. })
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    /// Provider-specific stop reason
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
    pub model: Option<String>,
}

impl LlmResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// All text blocks joined by newlines, trimmed.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    /// Tool use blocks as proposals, in the order the backend sent them.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse { id, name, input } => {
                    let mut call = ToolCall::new(name.clone())
                        .with_arguments(input.iter().map(|(k, v)| (k.clone(), v.clone())));
                    call.call_id = id.clone();
                    Some(call)
                }
                ContentBlock::Text(_) => None,
            })
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content.iter().any(ContentBlock::is_tool_use)
    }
}
