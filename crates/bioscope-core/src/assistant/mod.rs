//! Research assistant: summaries, cross-publication insights, query analysis
//!
//! `ResearchAssistant` is the capability seam between the service and any
//! text-generation backend. `LlmAssistant` talks to a chat completion
//! provider; `OfflineAssistant` derives deterministic answers from the
//! categorizer and facet counts, for tests and deployments without an API key.

pub mod llm;
pub mod offline;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use bioscope_domain::{InsightType, NewInsight, Publication};
use bioscope_llm::LLMError;

use crate::config::BioscopeConfig;

pub use llm::LlmAssistant;
pub use offline::OfflineAssistant;

/// Structured summary of a single publication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationSummary {
    pub summary: String,
    pub key_findings: Vec<String>,
    pub implications: Vec<String>,
    pub methodology: String,
    /// 1-10
    pub significance: u8,
}

/// An insight as produced by the assistant, before it is stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedInsight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    /// 0-100
    pub confidence: u8,
    pub related_topics: Vec<String>,
    pub actionable_recommendations: Vec<String>,
}

impl GeneratedInsight {
    /// Insert payload linking the insight to the publications it was drawn from
    pub fn into_new_insight(self, related_publications: Vec<String>) -> NewInsight {
        let metadata = HashMap::from([
            (
                "relatedTopics".to_string(),
                Value::from(self.related_topics),
            ),
            (
                "actionableRecommendations".to_string(),
                Value::from(self.actionable_recommendations),
            ),
        ]);

        NewInsight {
            insight_type: self.insight_type,
            title: self.title,
            description: self.description,
            confidence: Some(i64::from(self.confidence)),
            related_publications: Some(related_publications),
            related_experiments: Some(Vec::new()),
            metadata: Some(metadata),
        }
    }
}

/// Filter suggestions for a free-text query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedFilters {
    pub experiment_types: Vec<String>,
    pub organisms: Vec<String>,
    pub space_conditions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAnalysis {
    pub suggested_filters: SuggestedFilters,
    pub enhanced_query: String,
}

impl QueryAnalysis {
    /// No suggestions; the query passes through unchanged
    pub fn verbatim(query: &str) -> Self {
        Self {
            suggested_filters: SuggestedFilters::default(),
            enhanced_query: query.to_string(),
        }
    }
}

/// Text-generation capability used by the research service
#[async_trait]
pub trait ResearchAssistant: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &'static str;

    async fn summarize(
        &self,
        title: &str,
        abstract_text: &str,
    ) -> Result<PublicationSummary, LLMError>;

    /// Cross-publication insights. An empty slice yields an empty result.
    async fn generate_insights(
        &self,
        publications: &[Publication],
    ) -> Result<Vec<GeneratedInsight>, LLMError>;

    async fn analyze_query(&self, query: &str) -> Result<QueryAnalysis, LLMError>;
}

/// Pick the assistant for a configuration: LLM-backed when credentials are
/// available, offline otherwise
pub fn from_config(config: &BioscopeConfig) -> Arc<dyn ResearchAssistant> {
    if config.has_llm_credentials() {
        tracing::info!(
            provider = %config.llm.provider,
            model = %config.llm.model,
            "Using LLM research assistant"
        );
        Arc::new(LlmAssistant::new(&config.llm))
    } else {
        tracing::warn!("No LLM API key configured, using offline research assistant");
        Arc::new(OfflineAssistant::new())
    }
}
