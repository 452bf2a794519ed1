//! Pure wellness computations: questionnaire scoring and mood clustering.

pub mod mood;
pub mod screening;
