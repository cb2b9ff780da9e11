//! Gemini gateway (cloud backend)
//!
//! `POST /v1beta/models/{model}:generateContent` with function declarations.
//! The key travels in the `x-goog-api-key` header, never in the URL.

use super::{GenerationOptions, arguments_object, check_status, map_reqwest_error};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use severino_application::{GatewayError, GenerateRequest, LlmGateway};
use severino_domain::{ContentBlock, LlmResponse, StopReason, Turn};
use tracing::{debug, trace};

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    system_instruction: GeminiContent,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTools>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiTools {
    function_declarations: Vec<Value>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn new(role: &str, parts: Vec<GeminiPart>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
}

impl GeminiPart {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct FunctionResponse {
    name: String,
    response: Value,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Client for the Gemini API.
#[derive(Clone)]
pub struct GeminiGateway {
    client: Client,
    base_url: String,
    api_key: String,
    options: GenerationOptions,
}

impl std::fmt::Debug for GeminiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGateway")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl GeminiGateway {
    pub fn with_client(
        client: Client,
        base_url: &str,
        api_key: impl Into<String>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            options,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.options.model
        )
    }

    fn build_request(&self, request: &GenerateRequest<'_>) -> GeminiRequest {
        let declarations: Vec<Value> = request.tools.iter().map(to_declaration).collect();
        GeminiRequest {
            contents: build_contents(request.history),
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart::text(request.system_prompt)],
            },
            tools: if declarations.is_empty() {
                Vec::new()
            } else {
                vec![GeminiTools {
                    function_declarations: declarations,
                }]
            },
            generation_config: GenerationConfig {
                max_output_tokens: self.options.max_tokens,
                temperature: self.options.temperature,
            },
        }
    }
}

/// `{name, description, input_schema}` → Gemini function declaration.
///
/// Gemini's schema dialect has no `default`; defaults move into the
/// parameter description.
fn to_declaration(schema: &Value) -> Value {
    let mut parameters = schema["input_schema"].clone();
    if let Some(properties) = parameters
        .get_mut("properties")
        .and_then(Value::as_object_mut)
    {
        for property in properties.values_mut() {
            let Some(prop) = property.as_object_mut() else {
                continue;
            };
            if let Some(default) = prop.remove("default") {
                let description = format!(
                    "{} (default: {})",
                    prop.get("description")
                        .and_then(Value::as_str)
                        .unwrap_or_default(),
                    default
                );
                prop.insert("description".to_string(), json!(description));
            }
        }
    }
    json!({
        "name": schema["name"],
        "description": schema["description"],
        "parameters": parameters,
    })
}

fn build_contents(history: &[Turn]) -> Vec<GeminiContent> {
    let mut contents = Vec::new();
    for turn in history {
        match turn {
            Turn::User { content } => {
                contents.push(GeminiContent::new("user", vec![GeminiPart::text(content.clone())]))
            }
            Turn::Agent { content } => {
                contents.push(GeminiContent::new("model", vec![GeminiPart::text(content.clone())]))
            }
            Turn::ToolInvocation(invocation) => {
                let call = &invocation.call;
                let mut parts = Vec::new();
                if let Some(reasoning) = call.reasoning.as_deref().filter(|r| !r.is_empty()) {
                    parts.push(GeminiPart::text(reasoning));
                }
                parts.push(GeminiPart {
                    function_call: Some(FunctionCall {
                        name: call.tool_name.clone(),
                        args: call.arguments_json(),
                    }),
                    ..Default::default()
                });
                contents.push(GeminiContent::new("model", parts));

                let result = &invocation.result;
                let response = match result.error() {
                    Some(error) => json!({"error": error.to_string(), "code": error.code.as_str()}),
                    None => json!({"output": result.to_model_text()}),
                };
                contents.push(GeminiContent::new(
                    "user",
                    vec![GeminiPart {
                        function_response: Some(FunctionResponse {
                            name: call.tool_name.clone(),
                            response,
                        }),
                        ..Default::default()
                    }],
                ));
            }
        }
    }
    contents
}

fn parse_response(response: GeminiResponse) -> Result<LlmResponse, GatewayError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(GatewayError::Blocked(reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::MalformedResponse("response has no candidates".to_string()))?;

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    if parts.is_empty()
        && let Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")) =
            candidate.finish_reason.as_deref()
    {
        return Err(GatewayError::Blocked(reason.to_string()));
    }

    let mut content = Vec::new();
    for part in parts {
        if let Some(text) = part.text.filter(|t| !t.trim().is_empty()) {
            content.push(ContentBlock::Text(text));
        }
        if let Some(call) = part.function_call {
            content.push(ContentBlock::ToolUse {
                id: None,
                name: call.name,
                input: arguments_object(call.args)?,
            });
        }
    }

    let stop_reason = if content.iter().any(ContentBlock::is_tool_use) {
        Some(StopReason::ToolUse)
    } else {
        candidate.finish_reason.map(|reason| match reason.as_str() {
            "STOP" => StopReason::EndTurn,
            "MAX_TOKENS" => StopReason::MaxTokens,
            _ => StopReason::Other(reason),
        })
    };

    Ok(LlmResponse {
        content,
        stop_reason,
        model: response.model_version,
    })
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    fn provider(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.options.model
    }

    async fn generate(&self, request: GenerateRequest<'_>) -> Result<LlmResponse, GatewayError> {
        let body = self.build_request(&request);
        if tracing::enabled!(tracing::Level::TRACE)
            && let Ok(json) = serde_json::to_string(&body)
        {
            trace!("Gemini request payload: {}", json);
        }

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        debug!(status = %response.status(), "Gemini HTTP response");

        let response = match check_status(response).await {
            Err(GatewayError::HttpStatus { status: 404, .. }) => {
                return Err(GatewayError::ModelNotAvailable(self.options.model.clone()));
            }
            other => other?,
        };

        let parsed: GeminiResponse = response.json().await.map_err(map_reqwest_error)?;
        parse_response(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use severino_domain::{SideEffect, ToolCall, ToolInvocation, ToolResult};

    fn gateway() -> GeminiGateway {
        GeminiGateway::with_client(
            Client::new(),
            "https://generativelanguage.googleapis.com/",
            "secret",
            GenerationOptions {
                model: "gemini-1.5-pro".to_string(),
                max_tokens: 1000,
                temperature: 0.7,
            },
        )
    }

    #[test]
    fn test_endpoint_and_debug_hide_key() {
        let gateway = gateway();
        assert_eq!(
            gateway.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
        );
        assert!(!format!("{:?}", gateway).contains("secret"));
    }

    #[test]
    fn test_build_request_shape() {
        let history = vec![
            Turn::User {
                content: "what's in Cargo.toml?".to_string(),
            },
            Turn::ToolInvocation(ToolInvocation {
                call: ToolCall::new("read_file")
                    .with_arg("path", "Cargo.toml")
                    .with_reasoning("Reading the manifest."),
                side_effect: Some(SideEffect::ReadOnly),
                decision: None,
                executed: true,
                result: ToolResult::success("read_file", "[package]"),
            }),
        ];
        let tools = vec![json!({
            "name": "read_file",
            "description": "Read a file",
            "input_schema": {
                "type": "object",
                "properties": {
                    "offset": {"type": "integer", "description": "Start line", "default": 0}
                },
                "required": []
            }
        })];
        let request = GenerateRequest {
            system_prompt: "You are Severino.",
            history: &history,
            tools: &tools,
        };

        let body = serde_json::to_value(gateway().build_request(&request)).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are Severino.");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
        let declaration = &body["tools"][0]["functionDeclarations"][0];
        assert_eq!(declaration["name"], "read_file");
        let offset = &declaration["parameters"]["properties"]["offset"];
        assert!(offset.get("default").is_none());
        assert_eq!(offset["description"], "Start line (default: 0)");

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "Reading the manifest.");
        assert_eq!(contents[1]["parts"][1]["functionCall"]["args"]["path"], "Cargo.toml");
        assert_eq!(
            contents[2]["parts"][0]["functionResponse"]["response"]["output"],
            "[package]"
        );
    }

    #[test]
    fn test_parse_function_call() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "I'll list the directory."},
                        {"functionCall": {"name": "list_directory", "args": {"path": "src"}}}
                    ]
                },
                "finishReason": "STOP"
            }],
            "modelVersion": "gemini-1.5-pro-002"
        });
        let response = parse_response(serde_json::from_value(raw).unwrap()).unwrap();

        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
        assert_eq!(response.text_content(), "I'll list the directory.");
        assert_eq!(response.tool_calls()[0].get_str("path"), Some("src"));
        assert_eq!(response.model.as_deref(), Some("gemini-1.5-pro-002"));
    }

    #[test]
    fn test_parse_max_tokens_text() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "partial"}]},
                "finishReason": "MAX_TOKENS"
            }]
        });
        let response = parse_response(serde_json::from_value(raw).unwrap()).unwrap();
        assert_eq!(response.stop_reason, Some(StopReason::MaxTokens));
    }

    #[test]
    fn test_parse_blocked() {
        let raw = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let err = parse_response(serde_json::from_value(raw).unwrap()).unwrap_err();
        assert!(matches!(err, GatewayError::Blocked(reason) if reason == "SAFETY"));

        let raw = json!({"candidates": [{"finishReason": "SAFETY"}]});
        let err = parse_response(serde_json::from_value(raw).unwrap()).unwrap_err();
        assert!(matches!(err, GatewayError::Blocked(_)));

        let raw = json!({"candidates": []});
        let err = parse_response(serde_json::from_value(raw).unwrap()).unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
    }
}
