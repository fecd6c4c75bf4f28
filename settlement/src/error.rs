//! Error types for settlement engine

use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Score store error
    #[error("Store error: {0}")]
    Store(#[from] scorecard::Error),

    /// Input of the wrong shape (missing score, count mismatch, bad par)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Ledger or balance map that does not sum to zero
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Hole outside the configured round
    #[error("Hole {hole} outside round of {total_holes} holes")]
    HoleOutOfRange {
        /// Requested hole
        hole: u32,
        /// Holes in the round
        total_holes: u32,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
