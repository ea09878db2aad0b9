//! External publication sources

pub mod nasa;
pub mod traits;

pub use nasa::{sample_publications, NasaSource};
pub use traits::{ExternalPublication, PublicationSource, SourceError, SourceMetadata};
