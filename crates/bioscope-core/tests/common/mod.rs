//! Shared fixtures and stub collaborators for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use bioscope_core::domain::{parse_timestamp, NewPublication, Publication};
use bioscope_core::{
    ExternalPublication, GeneratedInsight, OfflineAssistant, PublicationSource, PublicationSummary,
    QueryAnalysis, ResearchAssistant, ResearchService, ServiceSettings, SourceError,
    SourceMetadata,
};
use bioscope_llm::LLMError;

/// Tagged publication payload
pub fn tagged(
    title: &str,
    date: Option<&str>,
    experiment_types: &[&str],
    mission: Option<&str>,
) -> NewPublication {
    NewPublication {
        published_date: date.and_then(parse_timestamp),
        experiment_types: Some(experiment_types.iter().map(|s| s.to_string()).collect()),
        mission: mission.map(String::from),
        ..NewPublication::titled(title)
    }
}

/// Six publications; "Plant Growth" tags exactly three of them
pub fn publication_fixtures() -> Vec<NewPublication> {
    vec![
        tagged("Root gravitropism", Some("2021-04-01"), &["Plant Growth"], Some("ISS")),
        tagged("Osteoblast culture", Some("2022-02-10"), &["Cell Biology", "Tissue Engineering"], Some("ISS")),
        tagged("Seedling growth under LED", Some("2023-08-19"), &["Plant Growth", "Cell Biology"], None),
        tagged("Biofilm formation", None, &["Microbiology"], Some("Space Shuttle")),
        tagged("Moss spore germination", Some("2020-11-30"), &["Plant Growth"], Some("Mars Mission")),
        tagged("Protein crystal quality", Some("2019-06-06"), &["Protein Crystallization"], None),
    ]
}

pub fn external(id: &str, title: &str, abstract_text: &str) -> ExternalPublication {
    ExternalPublication {
        source_id: id.to_string(),
        title: title.to_string(),
        abstract_text: Some(abstract_text.to_string()),
        authors: vec!["Dr. Test".to_string()],
        published_date: Some("2023-05-01".to_string()),
        doi: None,
        keywords: Vec::new(),
        url: None,
    }
}

/// Source that serves a fixed record list
pub struct StaticSource {
    pub records: Vec<ExternalPublication>,
    pub calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(records: Vec<ExternalPublication>) -> Self {
        Self {
            records,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PublicationSource for StaticSource {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            id: "static",
            name: "Static fixtures",
        }
    }

    async fn search(
        &self,
        _query: &str,
        limit: usize,
    ) -> Result<Vec<ExternalPublication>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.iter().take(limit).cloned().collect())
    }
}

/// Source that is always down
pub struct DownSource;

#[async_trait]
impl PublicationSource for DownSource {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            id: "down",
            name: "Unavailable",
        }
    }

    async fn search(&self, _: &str, _: usize) -> Result<Vec<ExternalPublication>, SourceError> {
        Err(SourceError::RateLimit)
    }
}

/// Assistant whose every call fails, counting insight requests
#[derive(Default)]
pub struct FailingAssistant {
    pub insight_calls: AtomicUsize,
}

#[async_trait]
impl ResearchAssistant for FailingAssistant {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn summarize(&self, _: &str, _: &str) -> Result<PublicationSummary, LLMError> {
        Err(LLMError::Timeout)
    }

    async fn generate_insights(
        &self,
        _: &[Publication],
    ) -> Result<Vec<GeneratedInsight>, LLMError> {
        self.insight_calls.fetch_add(1, Ordering::SeqCst);
        Err(LLMError::ApiError {
            message: "upstream unavailable".to_string(),
        })
    }

    async fn analyze_query(&self, _: &str) -> Result<QueryAnalysis, LLMError> {
        Err(LLMError::NetworkError {
            message: "offline".to_string(),
        })
    }
}

pub fn offline_service(source: Arc<dyn PublicationSource>) -> ResearchService {
    ResearchService::new(
        Arc::new(OfflineAssistant::new()),
        source,
        ServiceSettings::default(),
    )
}

pub fn empty_service() -> ResearchService {
    offline_service(Arc::new(StaticSource::new(Vec::new())))
}
