//! Store, filter engine, and aggregator integration tests

mod common;

use bioscope_core::domain::{
    parse_timestamp, NewExperiment, NewPublication, PublicationPatch, SearchFilters,
};
use bioscope_core::{FacetCount, ResearchStore};
use common::{publication_fixtures, tagged};
use proptest::prelude::*;

fn seeded_store() -> ResearchStore {
    let mut store = ResearchStore::new();
    for new in publication_fixtures() {
        store.create_publication(new);
    }
    store
}

fn titles(publications: &[bioscope_core::domain::Publication]) -> Vec<&str> {
    publications.iter().map(|p| p.title.as_str()).collect()
}

// === Filter Engine ===

#[test]
fn test_experiment_type_filter_returns_tagged_subset() {
    let store = seeded_store();
    let filters = SearchFilters {
        experiment_types: vec!["Plant Growth".to_string()],
        ..Default::default()
    };

    let result = store.publications(&filters);
    assert_eq!(
        titles(&result),
        vec![
            "Seedling growth under LED",
            "Root gravitropism",
            "Moss spore germination"
        ]
    );
    assert!(result
        .iter()
        .all(|p| p.experiment_types.contains(&"Plant Growth".to_string())));
}

#[test]
fn test_recency_order_with_undated_last() {
    let mut store = ResearchStore::new();
    store.create_publication(tagged("2020", Some("2020-01-01"), &[], None));
    store.create_publication(tagged("undated", None, &[], None));
    store.create_publication(tagged("2022", Some("2022-01-01"), &[], None));

    let result = store.publications(&SearchFilters::default());
    assert_eq!(titles(&result), vec!["2022", "2020", "undated"]);
}

#[test]
fn test_combined_filters() {
    let store = seeded_store();
    let filters = SearchFilters {
        query: Some("GROWTH".to_string()),
        mission: Some("ISS".to_string()),
        experiment_types: vec!["Plant Growth".to_string(), "Cell Biology".to_string()],
        ..Default::default()
    };
    // "Seedling growth under LED" has no mission, "Root gravitropism" lacks the text
    assert!(store.publications(&filters).is_empty());

    let filters = SearchFilters {
        mission: Some("ISS".to_string()),
        experiment_types: vec!["Cell Biology".to_string()],
        ..Default::default()
    };
    assert_eq!(titles(&store.publications(&filters)), vec!["Osteoblast culture"]);
}

#[test]
fn test_search_publications_is_query_filter() {
    let store = seeded_store();
    assert_eq!(
        store.search_publications("crystal"),
        store.publications(&SearchFilters::text("crystal"))
    );
    assert_eq!(titles(&store.search_publications("crystal")), vec!["Protein crystal quality"]);
}

// === Store ===

#[test]
fn test_created_list_fields_never_absent() {
    let mut store = ResearchStore::new();
    let created = store.create_publication(NewPublication::titled("Bare"));
    let json = serde_json::to_value(store.get_publication(&created.id).unwrap()).unwrap();

    for field in ["authors", "keywords", "experimentTypes", "organisms", "spaceConditions"] {
        assert!(json[field].is_array(), "{} should be an array", field);
    }
}

#[test]
fn test_update_unknown_id_is_absent() {
    let mut store = seeded_store();
    let before = store.publication_count();
    let patch = PublicationPatch {
        title: Some("Ghost".to_string()),
        ..Default::default()
    };
    assert!(store.update_publication("no-such-id", patch).is_none());
    assert_eq!(store.publication_count(), before);
    assert!(store.search_publications("Ghost").is_empty());
}

#[test]
fn test_mutations_visible_to_filters() {
    let mut store = seeded_store();
    let target = store.search_publications("Biofilm").remove(0);

    let patch = PublicationPatch {
        mission: Some(Some("ISS".to_string())),
        ..Default::default()
    };
    store.update_publication(&target.id, patch);

    let filters = SearchFilters {
        mission: Some("ISS".to_string()),
        ..Default::default()
    };
    assert!(titles(&store.publications(&filters)).contains(&"Biofilm formation"));
    assert_eq!(
        store.filter_options().missions[0],
        FacetCount {
            value: "ISS".to_string(),
            count: 3
        }
    );
}

// === Aggregates ===

#[test]
fn test_facets_count_each_record_once() {
    let mut store = ResearchStore::new();
    store.create_publication(tagged("dup", None, &["Cell Biology", "Cell Biology"], None));
    store.create_publication(tagged("single", None, &["Cell Biology"], None));

    let options = store.filter_options();
    assert_eq!(
        options.experiment_types,
        vec![FacetCount {
            value: "Cell Biology".to_string(),
            count: 2
        }]
    );
}

#[test]
fn test_stats() {
    let mut store = ResearchStore::new();
    store.create_publication(tagged("a", None, &["A", "B"], None));
    store.create_publication(tagged("b", None, &["B", "C"], None));
    store.create_publication(tagged("c", None, &["A"], None));
    store.create_experiment(NewExperiment {
        name: "Veggie".to_string(),
        experiment_type: "Plant Growth".to_string(),
        status: "active".to_string(),
        ..Default::default()
    });
    store.create_experiment(NewExperiment {
        name: "Rodent Research".to_string(),
        experiment_type: "Tissue Engineering".to_string(),
        status: "completed".to_string(),
        start_date: parse_timestamp("2020-01-01"),
        ..Default::default()
    });

    let stats = store.stats();
    assert_eq!(stats.total_publications, 3);
    assert_eq!(stats.research_areas, 3);
    assert_eq!(stats.active_experiments, 1);
    assert_eq!(stats.ai_insights, 0);
}

// === Properties ===

const MISSIONS: [&str; 3] = ["ISS", "Space Shuttle", "Mars Mission"];

fn mission_strategy() -> impl Strategy<Value = Option<&'static str>> {
    prop::option::of(prop::sample::select(MISSIONS.to_vec()))
}

fn date_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of((2000i32..2030, 1u32..13, 1u32..29).prop_map(|(y, m, d)| {
        format!("{:04}-{:02}-{:02}", y, m, d)
    }))
}

proptest! {
    #[test]
    fn test_mission_filter_returns_only_that_mission(
        missions in prop::collection::vec(mission_strategy(), 0..20),
        wanted in prop::sample::select(MISSIONS.to_vec()),
    ) {
        let mut store = ResearchStore::new();
        for (i, mission) in missions.iter().enumerate() {
            store.create_publication(tagged(&format!("p{}", i), None, &[], *mission));
        }

        let filters = SearchFilters { mission: Some(wanted.to_string()), ..Default::default() };
        let result = store.publications(&filters);

        prop_assert!(result.iter().all(|p| p.mission.as_deref() == Some(wanted)));
        let expected = missions.iter().filter(|m| **m == Some(wanted)).count();
        prop_assert_eq!(result.len(), expected);
    }

    #[test]
    fn test_output_sorted_by_date_desc_undated_last(
        dates in prop::collection::vec(date_strategy(), 0..25),
    ) {
        let mut store = ResearchStore::new();
        for (i, date) in dates.iter().enumerate() {
            store.create_publication(tagged(&format!("p{}", i), date.as_deref(), &[], None));
        }

        let result = store.publications(&SearchFilters::default());
        prop_assert_eq!(result.len(), dates.len());
        for pair in result.windows(2) {
            match (pair[0].published_date, pair[1].published_date) {
                (Some(a), Some(b)) => prop_assert!(a >= b),
                (None, Some(_)) => prop_assert!(false, "undated record before a dated one"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_empty_filters_keep_everything(count in 0usize..15) {
        let mut store = ResearchStore::new();
        for i in 0..count {
            store.create_publication(NewPublication::titled(format!("p{}", i)));
        }
        prop_assert_eq!(store.publications(&SearchFilters::default()).len(), count);
    }
}
