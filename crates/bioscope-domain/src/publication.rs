//! Publication domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::filters::deserialize_flexible_date;
use crate::validation::{require_text, ValidationError};

/// A space-biology publication held by the store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub authors: Vec<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub doi: Option<String>,
    pub keywords: Vec<String>,

    // Facet tags
    pub experiment_types: Vec<String>,
    pub organisms: Vec<String>,
    pub space_conditions: Vec<String>,
    pub mission: Option<String>,

    // Engagement
    pub citation_count: u32,
    pub view_count: u32,

    // AI processing
    pub ai_summary: Option<String>,
    pub is_processed: bool,

    // Metadata, owned by the store
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a publication. Everything except the title is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPublication {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub authors: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_flexible_date")]
    pub published_date: Option<DateTime<Utc>>,
    pub doi: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub experiment_types: Option<Vec<String>>,
    pub organisms: Option<Vec<String>>,
    pub space_conditions: Option<Vec<String>>,
    pub mission: Option<String>,
    pub citation_count: Option<u32>,
    pub view_count: Option<u32>,
    pub ai_summary: Option<String>,
    pub is_processed: Option<bool>,
}

impl NewPublication {
    /// Create an insert payload with just a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)
    }

    /// Materialize the stored record, normalizing absent lists and counters
    pub fn into_record(self, id: String, now: DateTime<Utc>) -> Publication {
        Publication {
            id,
            title: self.title,
            abstract_text: self.abstract_text,
            authors: self.authors.unwrap_or_default(),
            published_date: self.published_date,
            doi: self.doi,
            keywords: self.keywords.unwrap_or_default(),
            experiment_types: self.experiment_types.unwrap_or_default(),
            organisms: self.organisms.unwrap_or_default(),
            space_conditions: self.space_conditions.unwrap_or_default(),
            mission: self.mission,
            citation_count: self.citation_count.unwrap_or(0),
            view_count: self.view_count.unwrap_or(0),
            ai_summary: self.ai_summary,
            is_processed: self.is_processed.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a publication.
///
/// Absent fields are left untouched. For nullable fields an explicit `null`
/// clears the value (`Some(None)`). A present list replaces the old list.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationPatch {
    pub title: Option<String>,
    #[serde(default, rename = "abstract", deserialize_with = "deserialize_some")]
    pub abstract_text: Option<Option<String>>,
    pub authors: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_date")]
    pub published_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub doi: Option<Option<String>>,
    pub keywords: Option<Vec<String>>,
    pub experiment_types: Option<Vec<String>>,
    pub organisms: Option<Vec<String>>,
    pub space_conditions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub mission: Option<Option<String>>,
    pub citation_count: Option<u32>,
    pub view_count: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub ai_summary: Option<Option<String>>,
    pub is_processed: Option<bool>,
}

impl PublicationPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.title {
            Some(title) => require_text("title", title),
            None => Ok(()),
        }
    }
}

impl Publication {
    /// Shallow-merge a patch and refresh the update timestamp
    pub fn apply_patch(&mut self, patch: PublicationPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(abstract_text) = patch.abstract_text {
            self.abstract_text = abstract_text;
        }
        if let Some(authors) = patch.authors {
            self.authors = authors;
        }
        if let Some(published_date) = patch.published_date {
            self.published_date = published_date;
        }
        if let Some(doi) = patch.doi {
            self.doi = doi;
        }
        if let Some(keywords) = patch.keywords {
            self.keywords = keywords;
        }
        if let Some(experiment_types) = patch.experiment_types {
            self.experiment_types = experiment_types;
        }
        if let Some(organisms) = patch.organisms {
            self.organisms = organisms;
        }
        if let Some(space_conditions) = patch.space_conditions {
            self.space_conditions = space_conditions;
        }
        if let Some(mission) = patch.mission {
            self.mission = mission;
        }
        if let Some(citation_count) = patch.citation_count {
            self.citation_count = citation_count;
        }
        if let Some(view_count) = patch.view_count {
            self.view_count = view_count;
        }
        if let Some(ai_summary) = patch.ai_summary {
            self.ai_summary = ai_summary;
        }
        if let Some(is_processed) = patch.is_processed {
            self.is_processed = is_processed;
        }
        self.updated_at = now;
    }
}

/// Distinguish an explicit `null` from an absent field
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn deserialize_patch_date<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_flexible_date(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2024-05-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_into_record_normalizes_lists() {
        let record = NewPublication::titled("Root growth in orbit").into_record("p1".into(), now());

        assert_eq!(record.id, "p1");
        assert!(record.authors.is_empty());
        assert!(record.keywords.is_empty());
        assert!(record.experiment_types.is_empty());
        assert!(record.organisms.is_empty());
        assert!(record.space_conditions.is_empty());
        assert_eq!(record.citation_count, 0);
        assert_eq!(record.view_count, 0);
        assert!(!record.is_processed);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_new_publication_from_json() {
        let new: NewPublication = serde_json::from_str(
            r#"{
                "title": "Arabidopsis in microgravity",
                "abstract": "Root architecture changes.",
                "publishedDate": "2023-03-15",
                "organisms": null,
                "citationCount": 12
            }"#,
        )
        .unwrap();

        assert_eq!(new.abstract_text.as_deref(), Some("Root architecture changes."));
        assert_eq!(new.published_date.unwrap().to_rfc3339(), "2023-03-15T00:00:00+00:00");
        assert!(new.organisms.is_none());

        let record = new.into_record("p1".into(), now());
        assert!(record.organisms.is_empty());
        assert_eq!(record.citation_count, 12);
    }

    #[test]
    fn test_new_publication_requires_title() {
        assert!(serde_json::from_str::<NewPublication>(r#"{"abstract": "x"}"#).is_err());
        assert!(NewPublication::titled("  ").validate().is_err());
    }

    #[test]
    fn test_negative_counts_rejected() {
        let result = serde_json::from_str::<NewPublication>(r#"{"title": "t", "viewCount": -3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_null_clears_and_absent_keeps() {
        let mut record = NewPublication {
            mission: Some("ISS".into()),
            doi: Some("10.1000/x".into()),
            keywords: Some(vec!["roots".into()]),
            ..NewPublication::titled("Original")
        }
        .into_record("p1".into(), now());

        let patch: PublicationPatch =
            serde_json::from_str(r#"{"mission": null, "keywords": ["gravitropism"]}"#).unwrap();
        let later: DateTime<Utc> = "2024-06-01T00:00:00Z".parse().unwrap();
        record.apply_patch(patch, later);

        assert_eq!(record.mission, None);
        assert_eq!(record.doi.as_deref(), Some("10.1000/x"));
        assert_eq!(record.keywords, vec!["gravitropism"]);
        assert_eq!(record.title, "Original");
        assert_eq!(record.updated_at, later);
        assert_eq!(record.created_at, now());
    }

    #[test]
    fn test_serializes_camel_case() {
        let record = NewPublication::titled("T").into_record("p1".into(), now());
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("experimentTypes").is_some());
        assert!(json.get("spaceConditions").is_some());
        assert!(json.get("abstract").is_some());
        assert_eq!(json["isProcessed"], false);
    }
}
