//! PHQ-9 and GAD-7 questionnaire scoring.
//!
//! Every HTTP surface and the CLI route through [`ScoreEngine`] so banding lives in exactly one
//! place.

mod engine;
mod instrument;

pub use engine::{AnswerSet, ScoreEngine, ScoreResult, ScreeningError};
pub use instrument::{Instrument, Severity, UnknownInstrument};
