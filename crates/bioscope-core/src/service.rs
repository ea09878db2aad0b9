//! Research service: the single owner of the store
//!
//! Every operation the HTTP layer exposes goes through here. The store sits
//! behind an async read/write lock. Calls to the assistant or the publication
//! source are the only suspension points, and the lock is never held across
//! them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use bioscope_domain::{
    require_text, AiInsight, Experiment, NewExperiment, NewPublication, Publication,
    PublicationPatch, SearchFilters, ValidationError,
};

use crate::assistant::{self, ResearchAssistant, SuggestedFilters};
use crate::config::BioscopeConfig;
use crate::error::Result;
use crate::facets::FilterOptions;
use crate::ingest::{self, IngestReport, IngestRequest};
use crate::sources::{NasaSource, PublicationSource};
use crate::stats::DashboardStats;
use crate::store::ResearchStore;

/// Defaults applied by the service
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub default_query: String,
    pub default_limit: usize,
    pub max_insight_publications: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from(&BioscopeConfig::default())
    }
}

impl From<&BioscopeConfig> for ServiceSettings {
    fn from(config: &BioscopeConfig) -> Self {
        Self {
            default_query: config.nasa.default_query.clone(),
            default_limit: config.nasa.default_limit,
            max_insight_publications: config.insights.max_publications,
        }
    }
}

/// Search results plus query analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub publications: Vec<Publication>,
    pub suggested_filters: SuggestedFilters,
    pub enhanced_query: String,
}

pub struct ResearchService {
    store: RwLock<ResearchStore>,
    assistant: Arc<dyn ResearchAssistant>,
    source: Arc<dyn PublicationSource>,
    settings: ServiceSettings,
}

impl ResearchService {
    pub fn new(
        assistant: Arc<dyn ResearchAssistant>,
        source: Arc<dyn PublicationSource>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            store: RwLock::new(ResearchStore::new()),
            assistant,
            source,
            settings,
        }
    }

    /// Wire the NASA source and the configured assistant
    pub fn from_config(config: &BioscopeConfig) -> Self {
        Self::new(
            assistant::from_config(config),
            Arc::new(NasaSource::new(&config.nasa)),
            ServiceSettings::from(config),
        )
    }

    pub fn assistant_name(&self) -> &'static str {
        self.assistant.name()
    }

    // ========================================================================
    // Publications
    // ========================================================================

    pub async fn publications(&self, filters: &SearchFilters) -> Vec<Publication> {
        self.store.read().await.publications(filters)
    }

    pub async fn publication(&self, id: &str) -> Option<Publication> {
        self.store.read().await.get_publication(id).cloned()
    }

    pub async fn create_publication(&self, new: NewPublication) -> Result<Publication> {
        new.validate()?;
        Ok(self.store.write().await.create_publication(new))
    }

    /// `Ok(None)` when the id is unknown
    pub async fn update_publication(
        &self,
        id: &str,
        patch: PublicationPatch,
    ) -> Result<Option<Publication>> {
        patch.validate()?;
        Ok(self.store.write().await.update_publication(id, patch))
    }

    /// Free-text search with assistant query analysis.
    ///
    /// Analysis failure is not an error: the outcome carries no suggestions
    /// and the query verbatim.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        require_text("q", query)?;

        let publications = self.store.read().await.search_publications(query);

        let analysis = match self.assistant.analyze_query(query).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!("Query analysis failed, using query verbatim: {}", e);
                assistant::QueryAnalysis::verbatim(query)
            }
        };

        Ok(SearchOutcome {
            publications,
            suggested_filters: analysis.suggested_filters,
            enhanced_query: analysis.enhanced_query,
        })
    }

    // ========================================================================
    // Experiments
    // ========================================================================

    pub async fn experiments(&self) -> Vec<Experiment> {
        self.store.read().await.experiments()
    }

    pub async fn experiment(&self, id: &str) -> Option<Experiment> {
        self.store.read().await.get_experiment(id).cloned()
    }

    pub async fn create_experiment(&self, new: NewExperiment) -> Result<Experiment> {
        new.validate()?;
        Ok(self.store.write().await.create_experiment(new))
    }

    // ========================================================================
    // Insights
    // ========================================================================

    pub async fn insights(&self) -> Vec<AiInsight> {
        self.store.read().await.insights()
    }

    /// Analyze the most recent publications and persist every insight.
    ///
    /// Returns the stored records. With no publications the assistant is not
    /// called and nothing is stored. Assistant failure propagates.
    pub async fn generate_insights(&self) -> Result<Vec<AiInsight>> {
        let publications = self
            .store
            .read()
            .await
            .recent_publications(self.settings.max_insight_publications);

        if publications.is_empty() {
            tracing::info!("No publications to analyze, skipping insight generation");
            return Ok(Vec::new());
        }

        let generated = self.assistant.generate_insights(&publications).await?;
        let related: Vec<String> = publications.iter().map(|p| p.id.clone()).collect();

        let mut store = self.store.write().await;
        let stored: Vec<AiInsight> = generated
            .into_iter()
            .map(|insight| store.create_insight(insight.into_new_insight(related.clone())))
            .collect();

        tracing::info!(
            analyzed = publications.len(),
            generated = stored.len(),
            "Generated research insights"
        );
        Ok(stored)
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    pub async fn stats(&self) -> DashboardStats {
        self.store.read().await.stats()
    }

    pub async fn filter_options(&self) -> FilterOptions {
        self.store.read().await.filter_options()
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Pull publications from the source, categorize, summarize, and store them.
    ///
    /// Malformed records are skipped and counted only in `total`. A failed
    /// summary leaves the record without one.
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestReport> {
        let query = request
            .query
            .filter(|q| !q.trim().is_empty())
            .unwrap_or_else(|| self.settings.default_query.clone());
        let limit = request.limit.unwrap_or(self.settings.default_limit);
        if limit == 0 {
            return Err(ValidationError::new("limit", "must be positive").into());
        }

        let source = self.source.metadata();
        tracing::info!(
            source = source.id,
            query = %query,
            limit,
            "Ingesting publications from {}",
            source.name
        );

        let records = self.source.search(&query, limit).await?;
        let mut report = IngestReport {
            ingested: 0,
            total: records.len(),
        };

        for record in &records {
            let mut new = match ingest::normalize(record) {
                Ok(new) => new,
                Err(e) => {
                    tracing::warn!(source_id = %record.source_id, "Skipping malformed publication: {}", e);
                    continue;
                }
            };

            match self
                .assistant
                .summarize(&new.title, new.abstract_text.as_deref().unwrap_or_default())
                .await
            {
                Ok(summary) => new.ai_summary = Some(summary.summary),
                Err(e) => {
                    tracing::warn!(source_id = %record.source_id, "Summary generation failed: {}", e)
                }
            }

            self.store.write().await.create_publication(new);
            report.ingested += 1;
        }

        tracing::info!(
            ingested = report.ingested,
            total = report.total,
            "Ingestion finished"
        );
        Ok(report)
    }
}
