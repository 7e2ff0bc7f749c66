use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while loading or exporting review data.
///
/// Expected data conditions (unparsable dates, empty selections, inverted
/// date ranges) are never reported through this type; they are modelled as
/// values by the pipeline itself.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited input could not be parsed or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be produced.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A column required by the active column mapping is absent from the header.
    #[error("Required column missing from input: {0}")]
    MissingColumn(String),

    /// A sentiment label outside the positive/neutral/negative domain.
    #[error("Invalid sentiment label: {0}")]
    InvalidSentiment(String),

    /// A timezone name that is not a recognised IANA identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the review crates.
pub type Result<T> = std::result::Result<T, InsightsError>;
