//! In-memory research store
//!
//! One insertion-ordered, id-indexed table per entity. Records reference
//! each other by id only. There is no delete, so row positions never move
//! and insertion order doubles as the tie-break for every sort.

use std::collections::HashMap;

use chrono::Utc;

use bioscope_domain::{
    new_record_id, AiInsight, Experiment, NewExperiment, NewInsight, NewPublication, Publication,
    PublicationPatch, SearchFilters,
};

use crate::facets::{self, FilterOptions};
use crate::filter;
use crate::stats::{self, DashboardStats};

/// A record with a stable identifier
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Publication {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Experiment {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for AiInsight {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Insertion-ordered table with an id index
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Keyed> Table<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row with a fresh id
    pub fn insert(&mut self, row: T) -> &T {
        let position = self.rows.len();
        self.index.insert(row.key().to_string(), position);
        self.rows.push(row);
        &self.rows[position]
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.index.get(id).map(|&i| &mut self.rows[i])
    }

    /// Rows in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Owner of every publication, experiment, and insight record
#[derive(Debug, Default)]
pub struct ResearchStore {
    publications: Table<Publication>,
    experiments: Table<Experiment>,
    insights: Table<AiInsight>,
}

impl ResearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Publications
    // ========================================================================

    /// Assign an id and timestamps, normalizing absent lists and counters
    pub fn create_publication(&mut self, new: NewPublication) -> Publication {
        let record = new.into_record(new_record_id(), Utc::now());
        self.publications.insert(record).clone()
    }

    pub fn get_publication(&self, id: &str) -> Option<&Publication> {
        self.publications.get(id)
    }

    /// Shallow-merge a patch. Unknown ids yield `None` and create nothing.
    pub fn update_publication(&mut self, id: &str, patch: PublicationPatch) -> Option<Publication> {
        let publication = self.publications.get_mut(id)?;
        publication.apply_patch(patch, Utc::now());
        Some(publication.clone())
    }

    /// Filtered publications, most recent first
    pub fn publications(&self, filters: &SearchFilters) -> Vec<Publication> {
        filter::apply(self.publications.iter(), filters)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Free-text search over title, abstract, and keywords
    pub fn search_publications(&self, query: &str) -> Vec<Publication> {
        self.publications(&SearchFilters::text(query))
    }

    /// The `limit` most recent publications
    pub fn recent_publications(&self, limit: usize) -> Vec<Publication> {
        filter::apply(self.publications.iter(), &SearchFilters::default())
            .into_iter()
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn publication_count(&self) -> usize {
        self.publications.len()
    }

    // ========================================================================
    // Experiments
    // ========================================================================

    pub fn create_experiment(&mut self, new: NewExperiment) -> Experiment {
        let record = new.into_record(new_record_id(), Utc::now());
        self.experiments.insert(record).clone()
    }

    pub fn get_experiment(&self, id: &str) -> Option<&Experiment> {
        self.experiments.get(id)
    }

    /// All experiments by `startDate` descending, undated last
    pub fn experiments(&self) -> Vec<Experiment> {
        let mut experiments: Vec<&Experiment> = self.experiments.iter().collect();
        experiments.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        experiments.into_iter().cloned().collect()
    }

    // ========================================================================
    // Insights
    // ========================================================================

    pub fn create_insight(&mut self, new: NewInsight) -> AiInsight {
        let record = new.into_record(new_record_id(), Utc::now());
        self.insights.insert(record).clone()
    }

    /// All insights, newest first. Equal timestamps list the later insert first.
    pub fn insights(&self) -> Vec<AiInsight> {
        let mut insights: Vec<&AiInsight> = self.insights.iter().rev().collect();
        insights.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        insights.into_iter().cloned().collect()
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    pub fn stats(&self) -> DashboardStats {
        stats::compute(
            self.publications.iter(),
            self.experiments.iter(),
            self.insights.len(),
        )
    }

    /// Facets over the unfiltered store
    pub fn filter_options(&self) -> FilterOptions {
        facets::compute(self.publications.iter())
    }
}
