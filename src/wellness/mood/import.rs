use super::sample::{MoodError, MoodSample};
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum MoodImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { row: usize, source: MoodError },
}

impl std::fmt::Display for MoodImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoodImportError::Io(err) => write!(f, "failed to read mood export: {err}"),
            MoodImportError::Csv(err) => write!(f, "invalid mood CSV data: {err}"),
            MoodImportError::InvalidRow { row, source } => {
                write!(f, "mood CSV row {row}: {source}")
            }
        }
    }
}

impl std::error::Error for MoodImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MoodImportError::Io(err) => Some(err),
            MoodImportError::Csv(err) => Some(err),
            MoodImportError::InvalidRow { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for MoodImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for MoodImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads `valence,arousal,date` rows exported from the mood tracker.
pub struct MoodCsvImporter;

impl MoodCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<MoodSample>, MoodImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<MoodSample>, MoodImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut samples = Vec::new();

        for (index, record) in csv_reader.deserialize::<MoodSample>().enumerate() {
            let sample = record?;
            // Row 1 is the header.
            sample
                .validate()
                .map_err(|source| MoodImportError::InvalidRow {
                    row: index + 2,
                    source,
                })?;
            samples.push(sample);
        }

        Ok(samples)
    }
}
