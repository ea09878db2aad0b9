//! NASA open API source
//!
//! API docs: https://api.nasa.gov
//! Queries the techtransfer catalog. Records come back with loosely typed
//! fields, so mapping is lenient: several alternative field names are
//! accepted and authors/keywords may be strings, arrays, or objects.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::traits::{ExternalPublication, PublicationSource, SourceError, SourceMetadata};
use crate::config::NasaConfig;
use crate::http::{HttpClient, HttpError};

pub struct NasaSource {
    client: HttpClient,
    base_url: String,
    api_key: String,
    sample_fallback: bool,
}

impl NasaSource {
    pub fn new(config: &NasaConfig) -> Self {
        Self {
            client: HttpClient::new(
                "bioscope/0.1",
                Duration::from_secs(config.timeout_seconds),
            ),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            sample_fallback: config.sample_fallback,
        }
    }

    /// Parse a techtransfer search response
    pub fn parse_search_response(json: &str) -> Result<Vec<ExternalPublication>, SourceError> {
        let data: Value = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid NASA JSON: {}", e)))?;

        let results = data
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| SourceError::UnexpectedFormat("missing results array".to_string()))?;

        Ok(results.iter().map(Self::parse_item).collect())
    }

    fn parse_item(item: &Value) -> ExternalPublication {
        let source_id = match item.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => format!("nasa_{}", uuid::Uuid::new_v4()),
        };

        ExternalPublication {
            source_id,
            title: first_text(item, &["title", "name"]).unwrap_or_default(),
            abstract_text: first_text(item, &["abstract", "description", "summary"]),
            authors: parse_authors(first_present(item, &["inventor", "author"])),
            published_date: first_text(item, &["published_date", "date"]),
            doi: first_text(item, &["doi"]),
            keywords: parse_keywords(first_present(item, &["categories", "keywords"])),
            url: first_text(item, &["url", "link"]),
        }
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<ExternalPublication>, SourceError> {
        if query.trim().is_empty() {
            return Err(SourceError::InvalidQuery("query must not be empty".to_string()));
        }

        let url = format!("{}/techtransfer/patents", self.base_url);
        let limit_param = limit.to_string();
        let response = self
            .client
            .get_with_params(
                &url,
                &[
                    ("api_key", self.api_key.as_str()),
                    ("query", query),
                    ("limit", limit_param.as_str()),
                ],
            )
            .await?;

        if !response.is_success() {
            return Err(HttpError::Status {
                status: response.status,
            }
            .into());
        }

        let mut records = Self::parse_search_response(&response.body)?;
        records.truncate(limit);
        Ok(records)
    }
}

#[async_trait]
impl PublicationSource for NasaSource {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            id: "nasa",
            name: "NASA Open APIs",
        }
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ExternalPublication>, SourceError> {
        match self.fetch(query, limit).await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "NASA search returned records");
                Ok(records)
            }
            Err(e) if self.sample_fallback => {
                tracing::warn!("NASA API unavailable ({}), serving sample publications", e);
                let mut samples = sample_publications();
                samples.truncate(limit);
                Ok(samples)
            }
            Err(e) => Err(e),
        }
    }
}

fn first_present<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| item.get(*k))
        .find(|v| !v.is_null())
}

fn first_text(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| item.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

fn parse_authors(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Some(Value::Array(items)) => items
            .iter()
            .map(|a| match a {
                Value::String(s) => s.clone(),
                other => other
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown")
                    .to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_keywords(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Built-in space-biology publications served when the API is unavailable
pub fn sample_publications() -> Vec<ExternalPublication> {
    #[allow(clippy::too_many_arguments)]
    fn sample(
        id: &str,
        title: &str,
        abstract_text: &str,
        authors: [&str; 3],
        date: &str,
        doi: &str,
        keywords: [&str; 4],
        url: &str,
    ) -> ExternalPublication {
        ExternalPublication {
            source_id: id.to_string(),
            title: title.to_string(),
            abstract_text: Some(abstract_text.to_string()),
            authors: authors.iter().map(|s| s.to_string()).collect(),
            published_date: Some(date.to_string()),
            doi: Some(doi.to_string()),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            url: Some(url.to_string()),
        }
    }

    vec![
        sample(
            "nasa_sb_001",
            "Microgravity Effects on Arabidopsis Root Growth and Gene Expression",
            "This study examines how microgravity conditions affect root development and gravitropic responses in Arabidopsis thaliana plants aboard the International Space Station. Results show significant alterations in root architecture and differential gene expression patterns.",
            ["Dr. Sarah Johnson", "Dr. Michael Chen", "Dr. Elena Rodriguez"],
            "2023-03-15",
            "10.1016/j.spaceres.2023.001",
            ["microgravity", "plant biology", "gene expression", "root development"],
            "https://ntrs.nasa.gov/api/citations/20230001",
        ),
        sample(
            "nasa_sb_002",
            "Protein Crystallization in Microgravity: Enhanced Structure Determination",
            "Space-based protein crystallization experiments demonstrate improved crystal quality and resolution compared to Earth-based controls. This research advances our understanding of protein structure for drug development applications.",
            ["Dr. James Wilson", "Dr. Lisa Park", "Dr. Robert Thompson"],
            "2023-07-22",
            "10.1038/s41526-023-002",
            ["protein crystallization", "microgravity", "drug development", "structural biology"],
            "https://ntrs.nasa.gov/api/citations/20230002",
        ),
        sample(
            "nasa_sb_003",
            "Cellular Responses to Cosmic Radiation in Human Tissue Models",
            "Investigation of cellular damage and repair mechanisms in human tissue equivalents exposed to galactic cosmic radiation. Findings inform radiation protection strategies for long-duration spaceflight missions.",
            ["Dr. Amanda Foster", "Dr. Kevin Liu", "Dr. Rachel Adams"],
            "2023-11-08",
            "10.1089/ast.2023.003",
            ["cosmic radiation", "cellular damage", "tissue models", "radiation protection"],
            "https://ntrs.nasa.gov/api/citations/20230003",
        ),
        sample(
            "nasa_sb_004",
            "Bone Tissue Engineering in Simulated Martian Gravity Conditions",
            "Study of osteoblast behavior and bone formation processes under Martian gravity conditions (0.38g). Results provide insights for maintaining bone health during Mars exploration missions.",
            ["Dr. Thomas Garcia", "Dr. Maria Santos", "Dr. David Kim"],
            "2024-01-18",
            "10.1016/j.bone.2024.001",
            ["bone tissue", "Martian gravity", "osteoblasts", "tissue engineering"],
            "https://ntrs.nasa.gov/api/citations/20240001",
        ),
        sample(
            "nasa_sb_005",
            "Microbial Survival and Adaptation in Space Environment Conditions",
            "Comprehensive analysis of microbial communities exposed to space environment stressors including vacuum, temperature extremes, and radiation. Implications for planetary protection and astrobiology research.",
            ["Dr. Jennifer Wang", "Dr. Carlos Martinez", "Dr. Susan Brown"],
            "2024-04-12",
            "10.1128/aem.2024.001",
            ["microbiology", "space environment", "astrobiology", "planetary protection"],
            "https://ntrs.nasa.gov/api/citations/20240002",
        ),
    ]
}
