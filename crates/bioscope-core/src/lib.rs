//! Bioscope Core - query engine and ingestion pipeline for space-biology research
//!
//! # Architecture
//!
//! - **store**: insertion-ordered, id-indexed tables for publications,
//!   experiments, and insights
//! - **filter**: the filter engine (composable predicates, recency order)
//! - **facets** / **stats**: aggregates over the whole store
//! - **categorize**: keyword tagging of incoming publications
//! - **sources**: third-party publication catalogs (NASA)
//! - **assistant**: summaries, insights, and query analysis (LLM or offline)
//! - **service**: the lock-guarded owner of the store that the HTTP layer calls
//!
//! Data flows from a source through `ingest` into the store, and out through
//! the filter engine and aggregators.

pub mod assistant;
pub mod categorize;
pub mod config;
pub mod error;
pub mod facets;
pub mod filter;
pub mod http;
pub mod ingest;
pub mod service;
pub mod sources;
pub mod stats;
pub mod store;

pub use assistant::{
    GeneratedInsight, LlmAssistant, OfflineAssistant, PublicationSummary, QueryAnalysis,
    ResearchAssistant, SuggestedFilters,
};
pub use categorize::{categorize, Categories};
pub use config::{BioscopeConfig, ConfigError};
pub use error::{BioscopeError, Result};
pub use facets::{FacetCount, FilterOptions};
pub use ingest::{IngestReport, IngestRequest};
pub use service::{ResearchService, SearchOutcome, ServiceSettings};
pub use sources::{ExternalPublication, NasaSource, PublicationSource, SourceError, SourceMetadata};
pub use stats::DashboardStats;
pub use store::ResearchStore;

pub use bioscope_domain as domain;
