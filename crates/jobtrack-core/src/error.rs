use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the job-application tracker.
///
/// Row-level problems (a missing company, an unreadable date) are never
/// errors; they are filtered out during normalization. Only whole-table
/// failures surface here.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// The raw table does not have the column count the schema expects.
    #[error("Schema mismatch: expected {expected} columns, found {found}")]
    SchemaMismatch { expected: usize, found: usize },

    /// An input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV export could not be decoded.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A JSON document parsed but is not a grid of sheet values.
    #[error("Invalid sheet data: {0}")]
    InvalidSheet(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the tracker crates.
pub type Result<T> = std::result::Result<T, TrackerError>;
