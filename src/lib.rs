//! Althos: mood tracking, journaling, and PHQ-9/GAD-7 screening behind an HTTP API.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracker;
pub mod wellness;
