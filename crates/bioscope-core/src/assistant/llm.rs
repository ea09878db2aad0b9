//! LLM-backed research assistant

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use bioscope_domain::{clamp_confidence, InsightType, Publication};
use bioscope_llm::{LLMClient, LLMError, LLMMessage, LLMRequest};

use super::{
    GeneratedInsight, PublicationSummary, QueryAnalysis, ResearchAssistant, SuggestedFilters,
};
use crate::config::LlmConfig;

const SUMMARY_SYSTEM_PROMPT: &str = "You are a space biology specialist reviewing NASA research. \
Explain what each publication means for organisms living in space and for crewed exploration.";

const INSIGHT_SYSTEM_PROMPT: &str = "You are a space biology research analyst. \
Compare NASA publications and surface findings that should shape future missions.";

const QUERY_SYSTEM_PROMPT: &str = "You help researchers search a catalog of NASA space biology \
publications by interpreting their queries.";

pub const DEFAULT_SIGNIFICANCE: u8 = 5;
pub const DEFAULT_CONFIDENCE: i64 = 70;

pub struct LlmAssistant {
    client: LLMClient,
    provider: String,
    model: String,
    api_key: String,
    base_url: Option<String>,
    summary_temperature: f32,
    insight_temperature: f32,
    query_temperature: f32,
}

impl LlmAssistant {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: LLMClient::new(Duration::from_secs(config.timeout_seconds)),
            provider: config.provider.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            base_url: config.base_url.clone(),
            summary_temperature: config.summary_temperature,
            insight_temperature: config.insight_temperature,
            query_temperature: config.query_temperature,
        }
    }

    fn request(&self, system: &str, user: String, temperature: f32) -> LLMRequest {
        LLMRequest {
            provider: self.provider.clone(),
            model: self.model.clone(),
            messages: vec![LLMMessage::system(system), LLMMessage::user(user)],
            max_tokens: None,
            temperature: Some(temperature),
            top_p: None,
            json_mode: true,
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
        }
    }

    async fn complete_json(
        &self,
        system: &str,
        user: String,
        temperature: f32,
    ) -> Result<Value, LLMError> {
        let response = self
            .client
            .complete(&self.request(system, user, temperature))
            .await?;
        parse_json_content(&response.content)
    }
}

#[async_trait]
impl ResearchAssistant for LlmAssistant {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn summarize(
        &self,
        title: &str,
        abstract_text: &str,
    ) -> Result<PublicationSummary, LLMError> {
        let value = self
            .complete_json(
                SUMMARY_SYSTEM_PROMPT,
                summary_prompt(title, abstract_text),
                self.summary_temperature,
            )
            .await?;
        Ok(parse_summary(&value))
    }

    async fn generate_insights(
        &self,
        publications: &[Publication],
    ) -> Result<Vec<GeneratedInsight>, LLMError> {
        if publications.is_empty() {
            return Ok(Vec::new());
        }

        let value = self
            .complete_json(
                INSIGHT_SYSTEM_PROMPT,
                insights_prompt(publications)?,
                self.insight_temperature,
            )
            .await?;
        Ok(parse_insights(&value))
    }

    async fn analyze_query(&self, query: &str) -> Result<QueryAnalysis, LLMError> {
        let value = self
            .complete_json(QUERY_SYSTEM_PROMPT, query_prompt(query), self.query_temperature)
            .await?;
        Ok(parse_query_analysis(&value, query))
    }
}

// ============================================================================
// Prompts
// ============================================================================

pub fn summary_prompt(title: &str, abstract_text: &str) -> String {
    format!(
        r#"Summarize the NASA space biology publication below, focusing on how space conditions affected the biology studied and why it matters for future missions.

Title: {title}

Abstract: {abstract_text}

Answer with a JSON object of this shape:
{{
  "summary": "two or three sentences on the main findings",
  "keyFindings": ["three to five key results"],
  "implications": ["two to four implications for biology or exploration"],
  "methodology": "one sentence on the experimental approach",
  "significance": "integer from 1 to 10 rating importance to space biology"
}}"#
    )
}

pub fn insights_prompt(publications: &[Publication]) -> Result<String, LLMError> {
    let digest: Vec<Value> = publications
        .iter()
        .map(|p| {
            json!({
                "title": p.title,
                "experimentTypes": p.experiment_types,
                "organisms": p.organisms,
                "spaceConditions": p.space_conditions,
                "mission": p.mission,
                "aiSummary": p.ai_summary,
            })
        })
        .collect();
    let digest = serde_json::to_string_pretty(&digest).map_err(|e| LLMError::InvalidRequest {
        message: e.to_string(),
    })?;

    Ok(format!(
        r#"Compare the NASA space biology publications below and find insights that span experiments.

Publications:
{digest}

Look for:
1. correlations between space conditions and biological outcomes
2. trends and emerging research areas
3. recommendations for future experiments or mission planning

Answer with a JSON object of this shape:
{{
  "insights": [
    {{
      "type": "correlation | trend | recommendation",
      "title": "short insight title",
      "description": "full explanation of the insight",
      "confidence": "integer from 0 to 100",
      "relatedTopics": ["related research topics"],
      "actionableRecommendations": ["concrete next steps"]
    }}
  ]
}}"#
    ))
}

pub fn query_prompt(query: &str) -> String {
    format!(
        r#"A researcher searched a NASA space biology catalog for: "{query}"

Suggest filters and a refined query. Known values include:
- experiment types: "Cell Biology", "Plant Growth", "Protein Crystallization", "Microbiology", "Tissue Engineering"
- organisms: "C. elegans", "Arabidopsis", "E. coli", "Mouse tissue", "Human cells"
- space conditions: "Microgravity", "Radiation Exposure", "Temperature Variation"

Answer with a JSON object of this shape:
{{
  "suggestedFilters": {{
    "experimentTypes": [],
    "organisms": [],
    "spaceConditions": []
  }},
  "enhancedQuery": "refined search query"
}}"#
    )
}

// ============================================================================
// Response parsing
// ============================================================================

/// Parse the model's JSON object. Empty content is an empty object.
pub fn parse_json_content(content: &str) -> Result<Value, LLMError> {
    let content = content.trim();
    if content.is_empty() {
        return Ok(json!({}));
    }
    serde_json::from_str(content).map_err(|e| LLMError::MalformedResponse {
        message: format!("expected a JSON object: {}", e),
    })
}

pub fn parse_summary(value: &Value) -> PublicationSummary {
    let significance = value
        .get("significance")
        .and_then(lenient_int)
        .filter(|&s| s != 0)
        .map(|s| s.clamp(1, 10) as u8)
        .unwrap_or(DEFAULT_SIGNIFICANCE);

    PublicationSummary {
        summary: text_or(value, "summary", "Summary not available"),
        key_findings: string_list(value.get("keyFindings")),
        implications: string_list(value.get("implications")),
        methodology: text_or(value, "methodology", "Methodology not specified"),
        significance,
    }
}

pub fn parse_insights(value: &Value) -> Vec<GeneratedInsight> {
    let Some(items) = value.get("insights").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| GeneratedInsight {
            insight_type: item
                .get("type")
                .and_then(Value::as_str)
                .map(InsightType::parse_lenient)
                .unwrap_or(InsightType::Recommendation),
            title: text_or(item, "title", "Research Insight"),
            description: text_or(item, "description", ""),
            confidence: clamp_confidence(
                item.get("confidence")
                    .and_then(lenient_int)
                    .filter(|&c| c != 0)
                    .unwrap_or(DEFAULT_CONFIDENCE),
            ),
            related_topics: string_list(item.get("relatedTopics")),
            actionable_recommendations: string_list(item.get("actionableRecommendations")),
        })
        .collect()
}

pub fn parse_query_analysis(value: &Value, query: &str) -> QueryAnalysis {
    let filters = value.get("suggestedFilters");
    let field = |name: &str| string_list(filters.and_then(|f| f.get(name)));

    QueryAnalysis {
        suggested_filters: SuggestedFilters {
            experiment_types: field("experimentTypes"),
            organisms: field("organisms"),
            space_conditions: field("spaceConditions"),
        },
        enhanced_query: text_or(value, "enhancedQuery", query),
    }
}

fn text_or(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default)
        .to_string()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Integer from a number or from the leading digits of a string ("85%" -> 85)
fn lenient_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            let (sign, digits) = match s.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, s),
            };
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            digits[..end].parse::<i64>().ok().map(|n| sign * n)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bioscope_domain::NewPublication;
    use chrono::Utc;

    #[test]
    fn test_parse_summary_clamps_significance() {
        let summary = parse_summary(&json!({
            "summary": "Roots grew sideways.",
            "keyFindings": ["a", "b"],
            "significance": 14
        }));
        assert_eq!(summary.summary, "Roots grew sideways.");
        assert_eq!(summary.key_findings, vec!["a", "b"]);
        assert_eq!(summary.methodology, "Methodology not specified");
        assert_eq!(summary.significance, 10);

        assert_eq!(parse_summary(&json!({"significance": "8/10"})).significance, 8);
        assert_eq!(parse_summary(&json!({"significance": "high"})).significance, 5);
        assert_eq!(parse_summary(&json!({"significance": 0})).significance, 5);
        assert_eq!(parse_summary(&json!({"significance": "0"})).significance, 5);
        assert_eq!(parse_summary(&json!({"significance": -3})).significance, 1);
        assert_eq!(parse_summary(&json!({})).summary, "Summary not available");
    }

    #[test]
    fn test_parse_insights_defaults() {
        let insights = parse_insights(&json!({
            "insights": [
                {"type": "trend", "title": "More plant studies", "confidence": "85"},
                {"type": "speculation", "confidence": 250, "relatedTopics": ["bone"]},
                {"description": "no confidence"},
                "not an object"
            ]
        }));

        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].insight_type, InsightType::Trend);
        assert_eq!(insights[0].confidence, 85);
        assert_eq!(insights[1].insight_type, InsightType::Recommendation);
        assert_eq!(insights[1].title, "Research Insight");
        assert_eq!(insights[1].confidence, 100);
        assert_eq!(insights[1].related_topics, vec!["bone"]);
        assert_eq!(insights[2].confidence, 70);
        assert!(parse_insights(&json!({})).is_empty());
    }

    #[test]
    fn test_zero_confidence_uses_default() {
        let insights = parse_insights(&json!({
            "insights": [{"type": "trend", "confidence": 0}, {"type": "trend", "confidence": "0%"}]
        }));
        assert!(insights.iter().all(|i| i.confidence == 70));
    }

    #[test]
    fn test_parse_query_analysis_falls_back_to_query() {
        let analysis = parse_query_analysis(
            &json!({"suggestedFilters": {"organisms": ["Arabidopsis"]}}),
            "root growth",
        );
        assert_eq!(analysis.suggested_filters.organisms, vec!["Arabidopsis"]);
        assert!(analysis.suggested_filters.experiment_types.is_empty());
        assert_eq!(analysis.enhanced_query, "root growth");
    }

    #[test]
    fn test_parse_json_content() {
        assert_eq!(parse_json_content("  ").unwrap(), json!({}));
        assert!(matches!(
            parse_json_content("Sure! Here is your JSON"),
            Err(LLMError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_insights_prompt_includes_tags() {
        let publication = NewPublication {
            organisms: Some(vec!["Arabidopsis".into()]),
            mission: Some("ISS".into()),
            ..NewPublication::titled("Root growth in orbit")
        }
        .into_record("p1".into(), Utc::now());

        let prompt = insights_prompt(&[publication]).unwrap();
        assert!(prompt.contains("Root growth in orbit"));
        assert!(prompt.contains("\"organisms\""));
        assert!(prompt.contains("Arabidopsis"));
    }

    #[test]
    fn test_lenient_int() {
        assert_eq!(lenient_int(&json!(42)), Some(42));
        assert_eq!(lenient_int(&json!(7.9)), Some(7));
        assert_eq!(lenient_int(&json!(" 85% ")), Some(85));
        assert_eq!(lenient_int(&json!("-3")), Some(-3));
        assert_eq!(lenient_int(&json!("n/a")), None);
        assert_eq!(lenient_int(&json!(null)), None);
    }
}
