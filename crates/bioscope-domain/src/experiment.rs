//! Experiment domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filters::deserialize_flexible_date;
use crate::validation::{require_text, ValidationError};

/// Status value the stats aggregator counts as running
pub const ACTIVE_STATUS: &str = "active";

/// A flight or ground experiment. Publications are linked by id only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub experiment_type: String,
    /// Free text ("active", "completed", "planned", ...)
    pub status: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub mission: Option<String>,
    pub organisms: Vec<String>,
    pub conditions: Vec<String>,
    pub objectives: Vec<String>,
    pub results: Option<String>,
    pub publication_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Experiment {
    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }
}

/// Insert payload for an experiment
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExperiment {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub experiment_type: String,
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_flexible_date")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_flexible_date")]
    pub end_date: Option<DateTime<Utc>>,
    pub mission: Option<String>,
    pub organisms: Option<Vec<String>>,
    pub conditions: Option<Vec<String>>,
    pub objectives: Option<Vec<String>>,
    pub results: Option<String>,
    pub publication_ids: Option<Vec<String>>,
}

impl NewExperiment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("type", &self.experiment_type)?;
        require_text("status", &self.status)
    }

    pub fn into_record(self, id: String, now: DateTime<Utc>) -> Experiment {
        Experiment {
            id,
            name: self.name,
            description: self.description,
            experiment_type: self.experiment_type,
            status: self.status,
            start_date: self.start_date,
            end_date: self.end_date,
            mission: self.mission,
            organisms: self.organisms.unwrap_or_default(),
            conditions: self.conditions.unwrap_or_default(),
            objectives: self.objectives.unwrap_or_default(),
            results: self.results,
            publication_ids: self.publication_ids.unwrap_or_default(),
            created_at: now,
        }
    }
}
