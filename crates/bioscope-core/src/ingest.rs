//! Normalization of third-party records into store-insertable publications

use serde::{Deserialize, Serialize};

use bioscope_domain::{parse_timestamp, require_text, NewPublication, ValidationError};

use crate::categorize::categorize;
use crate::sources::ExternalPublication;

/// Ingest request body. Absent fields fall back to configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestRequest {
    pub query: Option<String>,
    pub limit: Option<usize>,
}

/// Outcome of an ingest run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Records stored
    pub ingested: usize,
    /// Records the source returned, malformed ones included
    pub total: usize,
}

impl IngestReport {
    pub fn message(&self) -> String {
        if self.total == 0 {
            "No publications found from NASA API".to_string()
        } else {
            format!(
                "Successfully ingested {} publications from NASA",
                self.ingested
            )
        }
    }
}

/// Turn an external record into an insert payload with derived tags.
///
/// A blank title makes the record malformed. An unparseable date leaves the
/// publication undated. Citation and view counts start at zero; the summary
/// is attached later by the caller.
pub fn normalize(external: &ExternalPublication) -> Result<NewPublication, ValidationError> {
    require_text("title", &external.title)?;

    let published_date = match external.published_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                tracing::debug!(source_id = %external.source_id, date = raw, "unparseable publication date");
            }
            parsed
        }
    };

    let title = external.title.trim().to_string();
    let categories = categorize(&title, external.abstract_text.as_deref(), &external.keywords);

    Ok(NewPublication {
        title,
        abstract_text: external.abstract_text.clone(),
        authors: Some(external.authors.clone()),
        published_date,
        doi: external.doi.clone(),
        keywords: Some(external.keywords.clone()),
        experiment_types: Some(categories.experiment_types),
        organisms: Some(categories.organisms),
        space_conditions: Some(categories.space_conditions),
        mission: categories.mission,
        citation_count: Some(0),
        view_count: Some(0),
        ai_summary: None,
        is_processed: Some(true),
    })
}
