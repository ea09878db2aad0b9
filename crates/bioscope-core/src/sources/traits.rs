//! Common traits for publication sources

use async_trait::async_trait;
use thiserror::Error;

use crate::http::HttpError;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(HttpError),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unexpected response format: {0}")]
    UnexpectedFormat(String),
    #[error("Rate limited")]
    RateLimit,
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl From<HttpError> for SourceError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::RateLimited => SourceError::RateLimit,
            other => SourceError::Http(other),
        }
    }
}

/// Metadata about a source
#[derive(Debug, Clone, Copy)]
pub struct SourceMetadata {
    pub id: &'static str,
    pub name: &'static str,
}

/// A publication record as a third party reports it, before normalization.
///
/// Fields are whatever the source supplied; a blank title or an unparseable
/// date makes the record malformed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalPublication {
    pub source_id: String,
    pub title: String,
    pub abstract_text: Option<String>,
    pub authors: Vec<String>,
    pub published_date: Option<String>,
    pub doi: Option<String>,
    pub keywords: Vec<String>,
    pub url: Option<String>,
}

/// A searchable third-party publication catalog
#[async_trait]
pub trait PublicationSource: Send + Sync {
    fn metadata(&self) -> SourceMetadata;

    /// Search the catalog, returning at most `limit` records
    async fn search(&self, query: &str, limit: usize)
        -> Result<Vec<ExternalPublication>, SourceError>;
}
