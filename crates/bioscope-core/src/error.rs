//! Error types for bioscope-core

use thiserror::Error;

use bioscope_domain::ValidationError;
use bioscope_llm::LLMError;

use crate::sources::SourceError;

/// Result type alias for bioscope operations
pub type Result<T> = std::result::Result<T, BioscopeError>;

/// Main error type for bioscope operations
#[derive(Error, Debug)]
pub enum BioscopeError {
    /// A referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A third-party collaborator (LLM provider, NASA API) failed
    #[error("{service} error: {message}")]
    ExternalService { service: String, message: String },

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BioscopeError {
    pub fn external(service: impl Into<String>, message: impl Into<String>) -> Self {
        BioscopeError::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }
}

impl From<LLMError> for BioscopeError {
    fn from(err: LLMError) -> Self {
        BioscopeError::external("LLM", err.to_string())
    }
}

impl From<SourceError> for BioscopeError {
    fn from(err: SourceError) -> Self {
        BioscopeError::external("Publication source", err.to_string())
    }
}

impl From<serde_json::Error> for BioscopeError {
    fn from(err: serde_json::Error) -> Self {
        BioscopeError::Internal(format!("serialization: {}", err))
    }
}
