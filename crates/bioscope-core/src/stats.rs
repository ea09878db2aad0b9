//! Dashboard statistics

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use bioscope_domain::{Experiment, Publication};

/// Headline numbers for the dashboard, recomputed on every call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_publications: usize,
    pub active_experiments: usize,
    /// Distinct experiment types across all publications
    pub research_areas: usize,
    pub ai_insights: usize,
}

pub fn compute<'a>(
    publications: impl IntoIterator<Item = &'a Publication>,
    experiments: impl IntoIterator<Item = &'a Experiment>,
    insight_count: usize,
) -> DashboardStats {
    let mut total_publications = 0;
    let mut areas: HashSet<&str> = HashSet::new();
    for publication in publications {
        total_publications += 1;
        areas.extend(publication.experiment_types.iter().map(String::as_str));
    }

    DashboardStats {
        total_publications,
        active_experiments: experiments.into_iter().filter(|e| e.is_active()).count(),
        research_areas: areas.len(),
        ai_insights: insight_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bioscope_domain::{NewExperiment, NewPublication};
    use chrono::Utc;

    fn with_types(types: &[&str]) -> Publication {
        NewPublication {
            experiment_types: Some(types.iter().map(|s| s.to_string()).collect()),
            ..NewPublication::titled("t")
        }
        .into_record(bioscope_domain::new_record_id(), Utc::now())
    }

    fn with_status(status: &str) -> Experiment {
        NewExperiment {
            name: "exp".into(),
            experiment_type: "Cell Biology".into(),
            status: status.into(),
            ..Default::default()
        }
        .into_record(bioscope_domain::new_record_id(), Utc::now())
    }

    #[test]
    fn test_research_areas_is_union_cardinality() {
        let pubs = vec![with_types(&["A", "B"]), with_types(&["B", "C"]), with_types(&["A"])];
        let stats = compute(&pubs, &Vec::new(), 0);
        assert_eq!(stats.research_areas, 3);
        assert_eq!(stats.total_publications, 3);
    }

    #[test]
    fn test_active_experiments_literal_status() {
        let exps = vec![with_status("active"), with_status("completed"), with_status("Active")];
        let stats = compute(&Vec::new(), &exps, 4);
        assert_eq!(stats.active_experiments, 1);
        assert_eq!(stats.ai_insights, 4);
    }

    #[test]
    fn test_empty_store() {
        assert_eq!(compute(&Vec::new(), &Vec::new(), 0), DashboardStats::default());
    }
}
