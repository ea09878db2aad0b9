//! Space-biology research domain types shared across bioscope crates
//!
//! This crate provides the canonical record shapes for the dashboard:
//! - Publication: a research paper with experiment/organism/condition tags
//! - Experiment: a flight or ground experiment referencing publications by id
//! - AiInsight: a generated correlation, trend, or recommendation
//! - SearchFilters: the ephemeral query descriptor used by the filter engine
//!
//! Records only ever reference each other by identifier. Ownership lives in
//! the store (`bioscope-core`).

pub mod experiment;
pub mod filters;
pub mod insight;
pub mod publication;
pub mod validation;

pub use experiment::*;
pub use filters::*;
pub use insight::*;
pub use publication::*;
pub use validation::*;

/// Generate a fresh record identifier
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
