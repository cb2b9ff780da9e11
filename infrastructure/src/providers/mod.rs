//! LLM backends
//!
//! Two [`LlmGateway`] adapters over HTTP:
//!
//! - [`OllamaGateway`]: a local Ollama server (`/api/chat`)
//! - [`GeminiGateway`]: the Gemini `generateContent` API
//!
//! Both translate the session history and the tool schemas into the
//! backend's wire format and parse the reply into an [`LlmResponse`].
//!
//! [`LlmResponse`]: severino_domain::LlmResponse

mod gemini;
mod ollama;

pub use gemini::GeminiGateway;
pub use ollama::OllamaGateway;

use crate::config::FileProviderConfig;
use reqwest::{Client, Response};
use severino_application::{GatewayError, LlmGateway};
use severino_domain::ProviderKind;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Generation parameters shared by both backends
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Build the gateway selected by `config`.
///
/// Fails with [`GatewayError::MissingApiKey`] when Gemini is selected
/// and no key can be found.
pub fn build_gateway(config: &FileProviderConfig) -> Result<Arc<dyn LlmGateway>, GatewayError> {
    let (kind, _) = config.parse_kind();
    let (model, _) = config.model_for(kind);
    let options = GenerationOptions {
        model,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };
    let client = http_client(Duration::from_secs(config.timeout_secs))?;

    info!(provider = kind.as_str(), model = %options.model, "Using LLM backend");

    let gateway: Arc<dyn LlmGateway> = match kind {
        ProviderKind::Ollama => Arc::new(OllamaGateway::with_client(
            client,
            &config.ollama.base_url,
            options,
        )),
        ProviderKind::Gemini => {
            let api_key = config
                .gemini
                .resolve_api_key()
                .ok_or_else(|| GatewayError::MissingApiKey(config.gemini.api_key_env.clone()))?;
            Arc::new(GeminiGateway::with_client(
                client,
                &config.gemini.base_url,
                api_key,
                options,
            ))
        }
    };
    Ok(gateway)
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client, GatewayError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| GatewayError::Other(format!("Failed to build HTTP client: {}", e)))
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_connect() {
        GatewayError::ConnectionError(err.to_string())
    } else if err.is_decode() {
        GatewayError::MalformedResponse(err.to_string())
    } else {
        GatewayError::Other(err.to_string())
    }
}

/// Turn a non-2xx response into [`GatewayError::HttpStatus`].
pub(crate) async fn check_status(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::HttpStatus {
        status: status.as_u16(),
        body: severino_domain::core::string::truncate(&body, 500),
    })
}

/// Tool arguments as sent back to a backend: always a JSON object.
pub(crate) fn arguments_object(
    value: serde_json::Value,
) -> Result<std::collections::BTreeMap<String, serde_json::Value>, GatewayError> {
    match value {
        serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
        serde_json::Value::Null => Ok(Default::default()),
        // Some models send the arguments as a JSON-encoded string.
        serde_json::Value::String(raw) if raw.trim().is_empty() => Ok(Default::default()),
        serde_json::Value::String(raw) => match serde_json::from_str(&raw) {
            Ok(serde_json::Value::Object(map)) => Ok(map.into_iter().collect()),
            _ => Err(GatewayError::MalformedResponse(format!(
                "tool arguments are not a JSON object: {}",
                raw
            ))),
        },
        other => Err(GatewayError::MalformedResponse(format!(
            "tool arguments are not a JSON object: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_arguments_object_accepts_string_encoded_json() {
        let args = arguments_object(json!("{\"path\": \"a.txt\"}")).unwrap();
        assert_eq!(args.get("path"), Some(&json!("a.txt")));
        assert!(arguments_object(json!(null)).unwrap().is_empty());
        assert!(arguments_object(json!([1, 2])).is_err());
        assert!(arguments_object(json!("not json")).is_err());
    }

    #[test]
    fn test_build_gemini_without_key_fails() {
        let mut config = FileProviderConfig {
            kind: "gemini".to_string(),
            ..Default::default()
        };
        config.gemini.api_key_env = "SEVERINO_TEST_NO_SUCH_KEY".to_string();

        let err = build_gateway(&config).err().unwrap();
        assert!(matches!(err, GatewayError::MissingApiKey(_)));
    }

    #[test]
    fn test_build_default_is_ollama() {
        let gateway = build_gateway(&FileProviderConfig::default()).unwrap();
        assert_eq!(gateway.provider(), "ollama");
        assert_eq!(gateway.model(), "gemma3");
    }
}
