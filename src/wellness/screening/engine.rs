use super::instrument::{Instrument, Severity, MAX_ITEM_SCORE};
use serde::Serialize;

/// Scored questionnaire with its severity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub instrument: Instrument,
    pub total: u8,
    pub severity: Severity,
    pub severity_label: &'static str,
}

/// Validated Likert answers for one questionnaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSet {
    instrument: Instrument,
    answers: Vec<u8>,
}

impl AnswerSet {
    pub fn new(instrument: Instrument, answers: &[i64]) -> Result<Self, ScreeningError> {
        let expected = instrument.item_count();
        if answers.len() != expected {
            return Err(ScreeningError::WrongLength {
                instrument,
                expected,
                actual: answers.len(),
            });
        }

        let answers = answers
            .iter()
            .enumerate()
            .map(|(index, &value)| match u8::try_from(value) {
                Ok(item) if item <= MAX_ITEM_SCORE => Ok(item),
                _ => Err(ScreeningError::OutOfRange {
                    index,
                    value: value.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            instrument,
            answers,
        })
    }

    /// Accept raw JSON numbers, rejecting fractional values before range checks.
    pub fn from_numbers(
        instrument: Instrument,
        numbers: &[serde_json::Number],
    ) -> Result<Self, ScreeningError> {
        let integers = numbers
            .iter()
            .enumerate()
            .map(|(index, number)| match number.as_i64() {
                Some(value) => Ok(value),
                // Unsigned integers past i64::MAX are whole numbers, just far too large.
                None if number.is_u64() => Err(ScreeningError::OutOfRange {
                    index,
                    value: number.to_string(),
                }),
                None => Err(ScreeningError::NotAnInteger {
                    index,
                    value: number.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(instrument, &integers)
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    pub fn answers(&self) -> &[u8] {
        &self.answers
    }

    pub fn total(&self) -> u8 {
        self.answers.iter().sum()
    }
}

/// Stateless PHQ-9/GAD-7 scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEngine;

impl ScoreEngine {
    pub fn score(instrument: Instrument, answers: &[i64]) -> Result<ScoreResult, ScreeningError> {
        let set = AnswerSet::new(instrument, answers)?;
        Ok(Self::score_set(&set))
    }

    pub fn score_set(set: &AnswerSet) -> ScoreResult {
        let total = set.total();
        let severity = set.instrument.severity(total);
        ScoreResult {
            instrument: set.instrument,
            total,
            severity,
            severity_label: severity.label(),
        }
    }
}

/// Invalid questionnaire input. Every variant is the same `InvalidInput` kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScreeningError {
    #[error("invalid input: {instrument} expects {expected} answers, received {actual}")]
    WrongLength {
        instrument: Instrument,
        expected: usize,
        actual: usize,
    },
    #[error("invalid input: answer {index} must be between 0 and 3, received {value}")]
    OutOfRange { index: usize, value: String },
    #[error("invalid input: answer {index} must be an integer, received {value}")]
    NotAnInteger { index: usize, value: String },
}
