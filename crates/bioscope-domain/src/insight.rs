//! AI-generated research insights

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{require_text, ValidationError};

/// Kind of cross-publication insight
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Correlation,
    Trend,
    Recommendation,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Correlation => "correlation",
            InsightType::Trend => "trend",
            InsightType::Recommendation => "recommendation",
        }
    }

    /// Parse a model-provided label; anything unrecognized is a recommendation
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "correlation" => InsightType::Correlation,
            "trend" => InsightType::Trend,
            _ => InsightType::Recommendation,
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored insight
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsight {
    pub id: String,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    /// 0-100
    pub confidence: u8,
    pub related_publications: Vec<String>,
    pub related_experiments: Vec<String>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for an insight
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInsight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    pub confidence: Option<i64>,
    pub related_publications: Option<Vec<String>>,
    pub related_experiments: Option<Vec<String>>,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl NewInsight {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)
    }

    pub fn into_record(self, id: String, now: DateTime<Utc>) -> AiInsight {
        AiInsight {
            id,
            insight_type: self.insight_type,
            title: self.title,
            description: self.description,
            confidence: clamp_confidence(self.confidence.unwrap_or(0)),
            related_publications: self.related_publications.unwrap_or_default(),
            related_experiments: self.related_experiments.unwrap_or_default(),
            metadata: self.metadata.unwrap_or_default(),
            created_at: now,
        }
    }
}

/// Clamp a confidence score into 0-100
pub fn clamp_confidence(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(clamp_confidence(-5), 0);
        assert_eq!(clamp_confidence(42), 42);
        assert_eq!(clamp_confidence(250), 100);
    }

    #[test]
    fn test_into_record_defaults() {
        let insight = NewInsight {
            insight_type: InsightType::Trend,
            title: "Rising interest in radiation shielding".into(),
            description: String::new(),
            confidence: Some(140),
            related_publications: None,
            related_experiments: None,
            metadata: None,
        }
        .into_record("i1".into(), Utc::now());

        assert_eq!(insight.confidence, 100);
        assert!(insight.related_publications.is_empty());
        assert!(insight.metadata.is_empty());
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(InsightType::parse_lenient("Correlation"), InsightType::Correlation);
        assert_eq!(InsightType::parse_lenient(" trend "), InsightType::Trend);
        assert_eq!(InsightType::parse_lenient("hypothesis"), InsightType::Recommendation);
    }

    #[test]
    fn test_type_serializes_lowercase() {
        let json = serde_json::to_string(&InsightType::Correlation).unwrap();
        assert_eq!(json, "\"correlation\"");
    }
}
