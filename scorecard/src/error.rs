//! Error types for the scorecard

use thiserror::Error;

/// Result type for scorecard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Scorecard errors
#[derive(Error, Debug)]
pub enum Error {
    /// Storage error (workbook layout, missing sheet, ...)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Roster rejected (too few / too many players, duplicate ids)
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    /// Score or par rejected
    #[error("Invalid score: {0}")]
    InvalidScore(String),

    /// Cell in a worksheet could not be parsed
    #[error("Malformed cell in {sheet} (row {row}, column {column}): {value:?}")]
    MalformedCell {
        /// Worksheet title
        sheet: String,
        /// Column header
        column: String,
        /// 1-based row number (header is row 1)
        row: usize,
        /// Raw cell contents
        value: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
