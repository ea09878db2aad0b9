//! Bioscope LLM - chat completion providers for the research dashboard
//!
//! # Supported Providers
//!
//! - **OpenAI**: default provider for summaries and insights
//! - **Groq**, **Mistral**, **DeepSeek**, **xAI**: hosted OpenAI-compatible APIs
//! - **Ollama**: local models, no API key required
//!
//! # Architecture
//!
//! All providers expose an OpenAI-compatible `/chat/completions` endpoint, so
//! `LLMClient` is a single async reqwest client; the registry only supplies
//! base URLs and defaults. Requests may ask for JSON-object responses, which
//! is how bioscope receives structured summaries and insights.

pub mod provider;
pub mod types;

pub use provider::*;
pub use types::*;
