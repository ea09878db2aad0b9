//! Facet aggregation for the filter sidebar

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use bioscope_domain::Publication;

/// A distinct value and the number of publications carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Distinct-value counts per categorical field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub experiment_types: Vec<FacetCount>,
    pub organisms: Vec<FacetCount>,
    pub space_conditions: Vec<FacetCount>,
    pub missions: Vec<FacetCount>,
}

/// Counts values in first-seen order
#[derive(Default)]
struct FacetCounter {
    counts: Vec<FacetCount>,
    index: HashMap<String, usize>,
}

impl FacetCounter {
    /// Count each distinct value of one record once
    fn add_record<'a>(&mut self, values: impl IntoIterator<Item = &'a String>) {
        let mut seen = HashSet::new();
        for value in values {
            if seen.insert(value.as_str()) {
                self.bump(value);
            }
        }
    }

    fn bump(&mut self, value: &str) {
        match self.index.get(value) {
            Some(&i) => self.counts[i].count += 1,
            None => {
                self.index.insert(value.to_string(), self.counts.len());
                self.counts.push(FacetCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    fn finish(self) -> Vec<FacetCount> {
        self.counts
    }
}

/// Aggregate facets over the given publications (normally the whole store)
pub fn compute<'a>(publications: impl IntoIterator<Item = &'a Publication>) -> FilterOptions {
    let mut experiment_types = FacetCounter::default();
    let mut organisms = FacetCounter::default();
    let mut space_conditions = FacetCounter::default();
    let mut missions = FacetCounter::default();

    for publication in publications {
        experiment_types.add_record(&publication.experiment_types);
        organisms.add_record(&publication.organisms);
        space_conditions.add_record(&publication.space_conditions);
        missions.add_record(&publication.mission);
    }

    FilterOptions {
        experiment_types: experiment_types.finish(),
        organisms: organisms.finish(),
        space_conditions: space_conditions.finish(),
        missions: missions.finish(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bioscope_domain::NewPublication;
    use chrono::Utc;

    fn tagged(types: &[&str], mission: Option<&str>) -> Publication {
        NewPublication {
            experiment_types: Some(types.iter().map(|s| s.to_string()).collect()),
            mission: mission.map(String::from),
            ..NewPublication::titled("t")
        }
        .into_record(bioscope_domain::new_record_id(), Utc::now())
    }

    fn facet(value: &str, count: usize) -> FacetCount {
        FacetCount {
            value: value.to_string(),
            count,
        }
    }

    #[test]
    fn test_counts_in_first_seen_order() {
        let pubs = vec![
            tagged(&["Plant Growth", "Cell Biology"], Some("ISS")),
            tagged(&["Cell Biology"], None),
            tagged(&["Microbiology", "Plant Growth"], Some("ISS")),
        ];
        let options = compute(&pubs);

        assert_eq!(
            options.experiment_types,
            vec![
                facet("Plant Growth", 2),
                facet("Cell Biology", 2),
                facet("Microbiology", 1)
            ]
        );
        assert_eq!(options.missions, vec![facet("ISS", 2)]);
        assert!(options.organisms.is_empty());
    }

    #[test]
    fn test_duplicate_tags_counted_once_per_record() {
        let pubs = vec![tagged(&["Cell Biology", "Cell Biology"], None)];
        let options = compute(&pubs);
        assert_eq!(options.experiment_types, vec![facet("Cell Biology", 1)]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(compute(&Vec::new())).unwrap();
        assert!(json["experimentTypes"].as_array().unwrap().is_empty());
        assert!(json["spaceConditions"].is_array());
        assert!(json["missions"].is_array());
    }
}
