//! Filter engine over the publication collection
//!
//! A pure function from (collection, filters) to an ordered subset. Active
//! predicates are AND-combined; list predicates match when the record shares
//! at least one value with the filter list.

use bioscope_domain::{DateRange, Publication, SearchFilters};

/// Filters prepared once per query
struct Predicate<'f> {
    query: Option<String>,
    experiment_types: &'f [String],
    organisms: &'f [String],
    space_conditions: &'f [String],
    mission: Option<&'f str>,
    date_range: Option<&'f DateRange>,
}

impl<'f> Predicate<'f> {
    fn new(filters: &'f SearchFilters) -> Self {
        Self {
            query: filters.normalized_query(),
            experiment_types: &filters.experiment_types,
            organisms: &filters.organisms,
            space_conditions: &filters.space_conditions,
            mission: filters.active_mission(),
            date_range: filters.active_date_range(),
        }
    }

    fn matches(&self, publication: &Publication) -> bool {
        if let Some(query) = &self.query {
            if !matches_text(publication, query) {
                return false;
            }
        }

        if !intersects(&publication.experiment_types, self.experiment_types)
            || !intersects(&publication.organisms, self.organisms)
            || !intersects(&publication.space_conditions, self.space_conditions)
        {
            return false;
        }

        if let Some(mission) = self.mission {
            if publication.mission.as_deref() != Some(mission) {
                return false;
            }
        }

        if let Some(range) = self.date_range {
            match publication.published_date {
                Some(date) if range.contains(date) => {}
                _ => return false,
            }
        }

        true
    }
}

/// Case-insensitive substring match on title, abstract, or any keyword
fn matches_text(publication: &Publication, query: &str) -> bool {
    publication.title.to_lowercase().contains(query)
        || publication
            .abstract_text
            .as_deref()
            .is_some_and(|a| a.to_lowercase().contains(query))
        || publication
            .keywords
            .iter()
            .any(|k| k.to_lowercase().contains(query))
}

/// An empty wanted list imposes no constraint
fn intersects(values: &[String], wanted: &[String]) -> bool {
    wanted.is_empty() || values.iter().any(|v| wanted.contains(v))
}

/// Select and order publications.
///
/// The input is expected in insertion order; the result is sorted by
/// `publishedDate` descending with undated records last, ties keeping their
/// input order.
pub fn apply<'a, I>(publications: I, filters: &SearchFilters) -> Vec<&'a Publication>
where
    I: IntoIterator<Item = &'a Publication>,
{
    let predicate = Predicate::new(filters);
    let mut selected: Vec<&Publication> = publications
        .into_iter()
        .filter(|p| predicate.matches(p))
        .collect();
    sort_by_recency(&mut selected);
    selected
}

/// Stable sort, most recent first. `None` sorts below every date.
pub fn sort_by_recency(publications: &mut [&Publication]) {
    publications.sort_by(|a, b| b.published_date.cmp(&a.published_date));
}
