//! Type definitions for chat completion requests
//!
//! These types are provider-neutral; `provider` maps them onto the
//! OpenAI-compatible wire format.

use serde::{Deserialize, Serialize};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMRole {
    System,
    User,
    Assistant,
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LLMMessage {
    /// Role of the message sender
    pub role: LLMRole,
    /// Text content of the message
    pub content: String,
}

impl LLMMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: LLMRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LLMRole::User,
            content: content.into(),
        }
    }
}

/// Request to complete a conversation
#[derive(Debug, Clone)]
pub struct LLMRequest {
    /// Provider identifier (e.g., "openai", "groq", "ollama")
    pub provider: String,
    /// Model identifier (e.g., "gpt-4o-mini")
    pub model: String,
    /// Conversation messages
    pub messages: Vec<LLMMessage>,
    /// Maximum tokens to generate (optional)
    pub max_tokens: Option<u32>,
    /// Temperature for sampling (0.0-2.0, optional)
    pub temperature: Option<f32>,
    /// Top-p nucleus sampling (optional)
    pub top_p: Option<f32>,
    /// Ask the provider for a JSON object response
    pub json_mode: bool,
    /// API key for the provider
    pub api_key: String,
    /// Overrides the provider's registered base URL
    pub base_url: Option<String>,
}

/// Response from a completion request
#[derive(Debug, Clone, PartialEq)]
pub struct LLMResponse {
    /// Generated content
    pub content: String,
    /// Number of tokens used in completion
    pub tokens_used: Option<u32>,
    /// Reason for completion ending
    pub finish_reason: String,
    /// Model that generated the response
    pub model: String,
}

/// Information about a supported provider
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    /// Unique identifier for the provider
    pub id: String,
    /// Display name
    pub name: String,
    /// OpenAI-compatible API root, without the `/chat/completions` suffix
    pub base_url: String,
    /// Whether the provider requires an API key
    pub requires_api_key: bool,
    /// Default model for this provider
    pub default_model: String,
    /// Whether the provider honors `response_format: json_object`
    pub supports_json_mode: bool,
    /// Category: "cloud" or "local"
    pub category: String,
}

/// Error types for LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Provider not found: {provider}")]
    ProviderNotFound { provider: String },

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limited: retry after {retry_after_seconds:?} seconds")]
    RateLimited { retry_after_seconds: Option<u32> },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Context length exceeded: {message}")]
    ContextLengthExceeded { message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },
}
