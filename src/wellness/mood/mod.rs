//! Mood samples, CSV import, and threshold clustering.

mod clusterer;
mod import;
mod sample;

pub use clusterer::{MoodCluster, MoodClusterReport, MoodClusterer};
pub use import::{MoodCsvImporter, MoodImportError};
pub use sample::{MoodError, MoodSample, AROUSAL_RANGE, VALENCE_RANGE};
