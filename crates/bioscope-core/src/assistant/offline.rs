//! Deterministic research assistant that needs no network access

use async_trait::async_trait;

use bioscope_domain::{clamp_confidence, InsightType, Publication};
use bioscope_llm::LLMError;

use super::{
    GeneratedInsight, PublicationSummary, QueryAnalysis, ResearchAssistant, SuggestedFilters,
};
use crate::categorize::{categorize_content, EXPERIMENT_TYPE_RULES};
use crate::facets::{self, FacetCount};

/// Answers derived from the categorizer and facet counts
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAssistant;

impl OfflineAssistant {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResearchAssistant for OfflineAssistant {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn summarize(
        &self,
        _title: &str,
        abstract_text: &str,
    ) -> Result<PublicationSummary, LLMError> {
        Ok(PublicationSummary {
            summary: first_sentence(abstract_text)
                .unwrap_or("Summary not available")
                .to_string(),
            key_findings: Vec::new(),
            implications: Vec::new(),
            methodology: "Methodology not specified".to_string(),
            significance: super::llm::DEFAULT_SIGNIFICANCE,
        })
    }

    async fn generate_insights(
        &self,
        publications: &[Publication],
    ) -> Result<Vec<GeneratedInsight>, LLMError> {
        Ok(derive_insights(publications))
    }

    async fn analyze_query(&self, query: &str) -> Result<QueryAnalysis, LLMError> {
        let categories = categorize_content(&query.to_lowercase());
        Ok(QueryAnalysis {
            suggested_filters: SuggestedFilters {
                experiment_types: categories.experiment_types,
                organisms: categories.organisms,
                space_conditions: categories.space_conditions,
            },
            enhanced_query: query.trim().to_string(),
        })
    }
}

fn first_sentence(text: &str) -> Option<&str> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match text.find(". ") {
        Some(end) => Some(&text[..=end]),
        None => Some(text),
    }
}

/// Highest count wins; ties go to the value seen first
fn top(counts: &[FacetCount]) -> Option<&FacetCount> {
    counts
        .iter()
        .fold(None, |best: Option<&FacetCount>, c| match best {
            Some(b) if b.count >= c.count => Some(b),
            _ => Some(c),
        })
}

fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    clamp_confidence(((part * 100) as f64 / whole as f64).round() as i64)
}

fn derive_insights(publications: &[Publication]) -> Vec<GeneratedInsight> {
    if publications.is_empty() {
        return Vec::new();
    }

    let total = publications.len();
    let options = facets::compute(publications);
    let mut insights = Vec::new();

    let top_type = top(&options.experiment_types);
    if let Some(area) = top_type {
        insights.push(GeneratedInsight {
            insight_type: InsightType::Trend,
            title: format!("{} leads recent research", area.value),
            description: format!(
                "{} of the {} most recent publications report {} experiments.",
                area.count, total, area.value
            ),
            confidence: percent(area.count, total),
            related_topics: vec![area.value.clone()],
            actionable_recommendations: Vec::new(),
        });
    }

    if let (Some(condition), Some(organism)) = (
        top(&options.space_conditions),
        top(&options.organisms),
    ) {
        let both = publications
            .iter()
            .filter(|p| {
                p.space_conditions.contains(&condition.value) && p.organisms.contains(&organism.value)
            })
            .count();
        if both > 0 {
            insights.push(GeneratedInsight {
                insight_type: InsightType::Correlation,
                title: format!("{} studies concentrate on {}", condition.value, organism.value),
                description: format!(
                    "{} of {} publications examining {} use {}.",
                    both, condition.count, condition.value, organism.value
                ),
                confidence: percent(both, condition.count),
                related_topics: vec![condition.value.clone(), organism.value.clone()],
                actionable_recommendations: Vec::new(),
            });
        }
    }

    let uncovered = EXPERIMENT_TYPE_RULES
        .iter()
        .map(|rule| rule.label)
        .find(|label| !options.experiment_types.iter().any(|c| c.value == *label));
    if let Some(label) = uncovered {
        insights.push(GeneratedInsight {
            insight_type: InsightType::Recommendation,
            title: format!("Expand {} coverage", label),
            description: format!("None of the analyzed publications report {} experiments.", label),
            confidence: 60,
            related_topics: vec![label.to_string()],
            actionable_recommendations: vec![format!("Plan a {} investigation", label)],
        });
    } else if let Some(area) = top_type {
        insights.push(GeneratedInsight {
            insight_type: InsightType::Recommendation,
            title: format!("Replicate {} findings", area.value),
            description: "Every tracked research area is represented; replication across missions would strengthen the evidence.".to_string(),
            confidence: 60,
            related_topics: vec![area.value.clone()],
            actionable_recommendations: vec![format!(
                "Repeat {} experiments on another mission",
                area.value
            )],
        });
    }

    insights
}
