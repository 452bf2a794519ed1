use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const VALENCE_RANGE: std::ops::RangeInclusive<f64> = -2.0..=2.0;
pub const AROUSAL_RANGE: std::ops::RangeInclusive<f64> = 0.0..=1.0;

/// Self-reported mood for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodSample {
    pub valence: f64,
    pub arousal: f64,
    pub date: NaiveDate,
}

impl MoodSample {
    pub fn new(valence: f64, arousal: f64, date: NaiveDate) -> Self {
        Self {
            valence,
            arousal,
            date,
        }
    }

    /// Range-check a sample before it is stored or clustered. NaN never passes.
    pub fn validate(&self) -> Result<(), MoodError> {
        if !VALENCE_RANGE.contains(&self.valence) {
            return Err(MoodError::ValenceOutOfRange(self.valence));
        }
        if !AROUSAL_RANGE.contains(&self.arousal) {
            return Err(MoodError::ArousalOutOfRange(self.arousal));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MoodError {
    #[error("invalid input: valence must be between -2 and 2, received {0}")]
    ValenceOutOfRange(f64),
    #[error("invalid input: arousal must be between 0 and 1, received {0}")]
    ArousalOutOfRange(f64),
}
