//! Keyword-based categorization of incoming publications
//!
//! Content is the lower-cased concatenation of title, abstract, and keywords.
//! Matching is plain substring containment. Experiment types, organisms, and
//! space conditions accumulate every matching label in table order; the
//! mission takes the first matching rule only.

use serde::{Deserialize, Serialize};

/// One label and the substrings that trigger it
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub label: &'static str,
    pub needles: &'static [&'static str],
}

impl Rule {
    fn matches(&self, content: &str) -> bool {
        self.needles.iter().any(|needle| content.contains(needle))
    }
}

pub const EXPERIMENT_TYPE_RULES: &[Rule] = &[
    Rule {
        label: "Cell Biology",
        needles: &["cell", "cellular"],
    },
    Rule {
        label: "Plant Growth",
        needles: &["plant", "botanic", "growth"],
    },
    Rule {
        label: "Protein Crystallization",
        needles: &["protein", "crystal"],
    },
    Rule {
        label: "Microbiology",
        needles: &["micro", "bacteria", "microbial"],
    },
    Rule {
        label: "Tissue Engineering",
        needles: &["tissue", "organ"],
    },
];

pub const ORGANISM_RULES: &[Rule] = &[
    Rule {
        label: "C. elegans",
        needles: &["elegans"],
    },
    Rule {
        label: "Arabidopsis",
        needles: &["arabidopsis", "thale cress"],
    },
    Rule {
        label: "E. coli",
        needles: &["e. coli", "escherichia"],
    },
    Rule {
        label: "Mouse tissue",
        needles: &["mouse", "mice", "murine"],
    },
    Rule {
        label: "Human cells",
        needles: &["human", "homo sapiens"],
    },
];

pub const SPACE_CONDITION_RULES: &[Rule] = &[
    Rule {
        label: "Microgravity",
        needles: &["microgravity", "zero gravity", "weightless"],
    },
    Rule {
        label: "Radiation Exposure",
        needles: &["radiation", "cosmic ray"],
    },
    Rule {
        label: "Temperature Variation",
        needles: &["temperature", "thermal"],
    },
];

/// Evaluated in order; the first hit wins
pub const MISSION_RULES: &[Rule] = &[
    Rule {
        label: "ISS",
        needles: &["iss", "international space station"],
    },
    Rule {
        label: "Space Shuttle",
        needles: &["shuttle"],
    },
    Rule {
        label: "Mars Mission",
        needles: &["mars", "martian"],
    },
];

/// Tags derived from publication text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Categories {
    pub experiment_types: Vec<String>,
    pub organisms: Vec<String>,
    pub space_conditions: Vec<String>,
    pub mission: Option<String>,
}

/// Categorize a publication from its text fields
pub fn categorize(title: &str, abstract_text: Option<&str>, keywords: &[String]) -> Categories {
    let content = format!(
        "{} {} {}",
        title,
        abstract_text.unwrap_or_default(),
        keywords.join(" ")
    )
    .to_lowercase();

    categorize_content(&content)
}

/// Categorize already lower-cased content
pub fn categorize_content(content: &str) -> Categories {
    Categories {
        experiment_types: matching_labels(EXPERIMENT_TYPE_RULES, content),
        organisms: matching_labels(ORGANISM_RULES, content),
        space_conditions: matching_labels(SPACE_CONDITION_RULES, content),
        mission: MISSION_RULES
            .iter()
            .find(|rule| rule.matches(content))
            .map(|rule| rule.label.to_string()),
    }
}

fn matching_labels(rules: &[Rule], content: &str) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| rule.matches(content))
        .map(|rule| rule.label.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Cellular signalling", &["Cell Biology"])]
    #[case("Botanic samples", &["Plant Growth"])]
    #[case("Protein structures", &["Protein Crystallization"])]
    #[case("Bacteria in orbit", &["Microbiology"])]
    #[case("Organ culture", &["Tissue Engineering"])]
    #[case("Cell walls of plant roots", &["Cell Biology", "Plant Growth"])]
    #[case("Astronaut sleep patterns", &[])]
    fn test_experiment_types(#[case] title: &str, #[case] expected: &[&str]) {
        let categories = categorize(title, None, &[]);
        assert_eq!(categories.experiment_types, expected);
    }

    #[rstest]
    #[case("C. elegans lifespan", "C. elegans")]
    #[case("Thale cress seedlings", "Arabidopsis")]
    #[case("Escherichia biofilms", "E. coli")]
    #[case("Murine bone loss", "Mouse tissue")]
    #[case("Homo sapiens immune response", "Human cells")]
    fn test_organisms(#[case] title: &str, #[case] expected: &str) {
        let categories = categorize(title, None, &[]);
        assert_eq!(categories.organisms, vec![expected]);
    }

    #[rstest]
    #[case("Weightless fluid dynamics", "Microgravity")]
    #[case("Cosmic ray exposure", "Radiation Exposure")]
    #[case("Thermal cycling", "Temperature Variation")]
    fn test_space_conditions(#[case] title: &str, #[case] expected: &str) {
        let categories = categorize(title, None, &[]);
        assert_eq!(categories.space_conditions, vec![expected]);
    }

    #[rstest]
    #[case("Payload aboard the ISS bound for Mars", Some("ISS"))]
    #[case("Shuttle-era samples compared with Martian analogs", Some("Space Shuttle"))]
    #[case("Martian regolith simulant", Some("Mars Mission"))]
    #[case("Ground control study", None)]
    fn test_mission_first_match(#[case] title: &str, #[case] expected: Option<&str>) {
        let categories = categorize(title, None, &[]);
        assert_eq!(categories.mission.as_deref(), expected);
    }

    #[test]
    fn test_cell_and_plant_both_tagged() {
        let categories = categorize("Plant cell responses", None, &[]);
        assert!(categories.experiment_types.contains(&"Cell Biology".to_string()));
        assert!(categories.experiment_types.contains(&"Plant Growth".to_string()));
    }

    #[test]
    fn test_abstract_and_keywords_contribute() {
        let categories = categorize(
            "Untitled",
            Some("Samples flown on the International Space Station."),
            &["Radiation".to_string(), "Arabidopsis".to_string()],
        );
        assert_eq!(categories.mission.as_deref(), Some("ISS"));
        assert_eq!(categories.organisms, vec!["Arabidopsis"]);
        assert_eq!(categories.space_conditions, vec!["Radiation Exposure"]);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let categories = categorize("MICROGRAVITY", None, &[]);
        assert_eq!(categories.space_conditions, vec!["Microgravity"]);
        // "micro" is also an experiment-type needle
        assert_eq!(categories.experiment_types, vec!["Microbiology"]);
    }
}
