//! Ollama gateway (local backend)
//!
//! Non-streaming `POST /api/chat` with native tool calling.

use super::{GenerationOptions, arguments_object, check_status, map_reqwest_error};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use severino_application::{GatewayError, GenerateRequest, LlmGateway};
use severino_domain::{ContentBlock, LlmResponse, StopReason, Turn};
use tracing::{debug, trace};

#[derive(Serialize, Debug)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize, Debug)]
struct OllamaOptions {
    num_predict: u32,
    temperature: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<OllamaToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_name: Option<String>,
}

impl OllamaMessage {
    fn text(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
            tool_calls: Vec::new(),
            tool_name: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct OllamaToolCall {
    function: OllamaFunction,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct OllamaFunction {
    #[serde(default)]
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Deserialize, Debug)]
struct OllamaChatResponse {
    #[serde(default)]
    model: Option<String>,
    message: Option<OllamaMessage>,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaGateway {
    client: Client,
    base_url: String,
    options: GenerationOptions,
}

impl OllamaGateway {
    pub fn with_client(client: Client, base_url: &str, options: GenerationOptions) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            options,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request<'a>(&'a self, request: &GenerateRequest<'_>) -> OllamaChatRequest<'a> {
        OllamaChatRequest {
            model: &self.options.model,
            messages: build_messages(request.system_prompt, request.history),
            tools: request.tools.iter().map(to_ollama_tool).collect(),
            stream: false,
            options: OllamaOptions {
                num_predict: self.options.max_tokens,
                temperature: self.options.temperature,
            },
        }
    }
}

/// `{name, description, input_schema}` → Ollama function tool.
fn to_ollama_tool(schema: &Value) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": schema["name"],
            "description": schema["description"],
            "parameters": schema["input_schema"],
        }
    })
}

fn build_messages(system_prompt: &str, history: &[Turn]) -> Vec<OllamaMessage> {
    let mut messages = vec![OllamaMessage::text("system", system_prompt)];
    for turn in history {
        match turn {
            Turn::User { content } => messages.push(OllamaMessage::text("user", content.clone())),
            Turn::Agent { content } => {
                messages.push(OllamaMessage::text("assistant", content.clone()))
            }
            Turn::ToolInvocation(invocation) => {
                let call = &invocation.call;
                messages.push(OllamaMessage {
                    tool_calls: vec![OllamaToolCall {
                        function: OllamaFunction {
                            name: call.tool_name.clone(),
                            arguments: call.arguments_json(),
                        },
                    }],
                    ..OllamaMessage::text("assistant", call.reasoning.clone().unwrap_or_default())
                });
                messages.push(OllamaMessage {
                    tool_name: Some(call.tool_name.clone()),
                    ..OllamaMessage::text("tool", invocation.result.to_model_text())
                });
            }
        }
    }
    messages
}

fn parse_response(response: OllamaChatResponse) -> Result<LlmResponse, GatewayError> {
    if let Some(error) = response.error {
        return Err(GatewayError::Other(error));
    }
    let message = response
        .message
        .ok_or_else(|| GatewayError::MalformedResponse("response has no message".to_string()))?;

    let mut content = Vec::new();
    if !message.content.trim().is_empty() {
        content.push(ContentBlock::Text(message.content));
    }
    for call in message.tool_calls {
        content.push(ContentBlock::ToolUse {
            id: None,
            name: call.function.name,
            input: arguments_object(call.function.arguments)?,
        });
    }

    let stop_reason = if content.iter().any(ContentBlock::is_tool_use) {
        Some(StopReason::ToolUse)
    } else {
        response.done_reason.map(|reason| match reason.as_str() {
            "stop" => StopReason::EndTurn,
            "length" => StopReason::MaxTokens,
            _ => StopReason::Other(reason),
        })
    };

    Ok(LlmResponse {
        content,
        stop_reason,
        model: response.model,
    })
}

#[async_trait]
impl LlmGateway for OllamaGateway {
    fn provider(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.options.model
    }

    async fn generate(&self, request: GenerateRequest<'_>) -> Result<LlmResponse, GatewayError> {
        let body = self.build_request(&request);
        if tracing::enabled!(tracing::Level::TRACE)
            && let Ok(json) = serde_json::to_string(&body)
        {
            trace!("Ollama request payload: {}", json);
        }

        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        debug!(status = %response.status(), "Ollama HTTP response");

        let response = match check_status(response).await {
            Err(GatewayError::HttpStatus { status: 404, body }) if body.contains("not found") => {
                return Err(GatewayError::ModelNotAvailable(format!(
                    "{} (try `ollama pull {}`)",
                    self.options.model, self.options.model
                )));
            }
            other => other?,
        };

        let parsed: OllamaChatResponse = response.json().await.map_err(map_reqwest_error)?;
        parse_response(parsed)
    }
}
