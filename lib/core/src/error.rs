use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load feature data from {path}: {reason}")]
    DataLoad { path: String, reason: String },

    #[error("Unknown external identifier: {0}")]
    UnknownIdentifier(String),

    #[error("Unknown registry code: {0}")]
    UnknownRegistryCode(String),

    #[error("No record for language pair ({0}, {1})")]
    UnknownLanguagePair(String, String),

    #[error("Characteristics not populated for language: {0}")]
    NotPopulated(String),

    #[error("No score stored for pair ({0}, {1})")]
    PairNotScored(String, String),

    #[error("Cannot normalise {pairs} scores with threshold {threshold}: top slice is empty")]
    InsufficientData { pairs: usize, threshold: f64 },

    #[error("Degenerate normalisation: score range [{low}, {high}] has zero width")]
    DegenerateNormalization { low: f64, high: f64 },

    #[error("Cache is empty: no snapshot in {0}")]
    EmptyCache(String),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub fn data_load(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        Error::DataLoad {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }
}
