//! OpenAI-compatible provider implementations
//!
//! Every registered provider speaks the `/chat/completions` dialect, so a
//! single client covers all of them; only the base URL and defaults differ.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::types::*;

// ============================================================================
// Provider Registry
// ============================================================================

/// Get information about all supported providers
pub fn get_providers() -> Vec<ProviderInfo> {
    vec![
        ProviderInfo {
            id: "openai".to_string(),
            name: "OpenAI".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            requires_api_key: true,
            default_model: "gpt-4o-mini".to_string(),
            supports_json_mode: true,
            category: "cloud".to_string(),
        },
        ProviderInfo {
            id: "groq".to_string(),
            name: "Groq".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            requires_api_key: true,
            default_model: "llama-3.3-70b-versatile".to_string(),
            supports_json_mode: true,
            category: "cloud".to_string(),
        },
        ProviderInfo {
            id: "mistral".to_string(),
            name: "Mistral AI".to_string(),
            base_url: "https://api.mistral.ai/v1".to_string(),
            requires_api_key: true,
            default_model: "mistral-large-latest".to_string(),
            supports_json_mode: true,
            category: "cloud".to_string(),
        },
        ProviderInfo {
            id: "deepseek".to_string(),
            name: "DeepSeek".to_string(),
            base_url: "https://api.deepseek.com/v1".to_string(),
            requires_api_key: true,
            default_model: "deepseek-chat".to_string(),
            supports_json_mode: true,
            category: "cloud".to_string(),
        },
        ProviderInfo {
            id: "xai".to_string(),
            name: "xAI (Grok)".to_string(),
            base_url: "https://api.x.ai/v1".to_string(),
            requires_api_key: true,
            default_model: "grok-beta".to_string(),
            supports_json_mode: false,
            category: "cloud".to_string(),
        },
        ProviderInfo {
            id: "ollama".to_string(),
            name: "Ollama".to_string(),
            base_url: "http://localhost:11434/v1".to_string(),
            requires_api_key: false,
            default_model: "llama3.1".to_string(),
            supports_json_mode: true,
            category: "local".to_string(),
        },
    ]
}

/// Look up a provider by id
pub fn get_provider(provider_id: &str) -> Result<ProviderInfo, LLMError> {
    get_providers()
        .into_iter()
        .find(|p| p.id == provider_id)
        .ok_or_else(|| LLMError::ProviderNotFound {
            provider: provider_id.to_string(),
        })
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [LLMMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

/// Build the JSON body for a chat completion request
pub fn build_request_body(
    request: &LLMRequest,
    provider: &ProviderInfo,
) -> Result<serde_json::Value, LLMError> {
    if request.messages.is_empty() {
        return Err(LLMError::InvalidRequest {
            message: "at least one message is required".to_string(),
        });
    }

    let body = ChatCompletionBody {
        model: &request.model,
        messages: &request.messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        top_p: request.top_p,
        response_format: (request.json_mode && provider.supports_json_mode).then_some(
            ResponseFormat {
                kind: "json_object",
            },
        ),
    };

    serde_json::to_value(&body).map_err(|e| LLMError::InvalidRequest {
        message: e.to_string(),
    })
}

/// Parse a successful chat completion body
pub fn parse_completion_response(body: &str, requested_model: &str) -> Result<LLMResponse, LLMError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| LLMError::MalformedResponse {
            message: e.to_string(),
        })?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::MalformedResponse {
            message: "no choices in response".to_string(),
        })?;

    Ok(LLMResponse {
        content: choice.message.content.unwrap_or_default(),
        tokens_used: parsed.usage.map(|u| u.total_tokens),
        finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
        model: parsed.model.unwrap_or_else(|| requested_model.to_string()),
    })
}

/// Map a non-success HTTP status to an error
pub fn error_for_status(status: StatusCode, body: &str, retry_after: Option<u32>) -> LLMError {
    let lower = body.to_lowercase();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LLMError::InvalidApiKey,
        StatusCode::TOO_MANY_REQUESTS => LLMError::RateLimited {
            retry_after_seconds: retry_after,
        },
        StatusCode::BAD_REQUEST if lower.contains("context") && lower.contains("length") => {
            LLMError::ContextLengthExceeded {
                message: body.to_string(),
            }
        }
        StatusCode::BAD_REQUEST => LLMError::InvalidRequest {
            message: body.to_string(),
        },
        _ => LLMError::ApiError {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}

// ============================================================================
// Client
// ============================================================================

/// Async chat completion client shared across requests
#[derive(Debug, Clone)]
pub struct LLMClient {
    client: Client,
}

impl LLMClient {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Execute a completion request
    pub async fn complete(&self, request: &LLMRequest) -> Result<LLMResponse, LLMError> {
        let provider = get_provider(&request.provider)?;
        if provider.requires_api_key && request.api_key.is_empty() {
            return Err(LLMError::InvalidApiKey);
        }

        let base_url = request
            .base_url
            .as_deref()
            .unwrap_or(&provider.base_url)
            .trim_end_matches('/');
        let url = format!("{}/chat/completions", base_url);
        let body = build_request_body(request, &provider)?;

        tracing::debug!(provider = %provider.id, model = %request.model, "sending chat completion");

        let mut builder = self.client.post(&url).json(&body);
        if !request.api_key.is_empty() {
            builder = builder.bearer_auth(&request.api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                LLMError::Timeout
            } else {
                LLMError::NetworkError {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let text = response.text().await.map_err(|e| LLMError::NetworkError {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(error_for_status(status, &text, retry_after));
        }

        let parsed = parse_completion_response(&text, &request.model)?;
        tracing::debug!(tokens = ?parsed.tokens_used, "chat completion finished");
        Ok(parsed)
    }
}

impl Default for LLMClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

// ============================================================================
// Tests
// ============================================================================
