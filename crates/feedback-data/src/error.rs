//! Error types for the feedback-data crate.

use thiserror::Error;

/// Errors that can occur while loading or constructing feedback data.
///
/// Malformed or empty input is the caller's problem and is reported
/// synchronously; nothing in this crate retries or degrades silently.
#[derive(Error, Debug)]
pub enum DataError {
    /// A dataset cannot be built from zero records; training needs examples
    #[error("feedback dataset contains no records")]
    EmptyDataset,

    /// An operation was handed a subset with no records in it
    #[error("the {subset} subset contains no records")]
    EmptySubset { subset: &'static str },

    /// I/O error occurred while reading a feedback file
    #[error("failed to read feedback file: {0}")]
    Io(#[from] std::io::Error),

    /// Feedback file couldn't be decoded as a JSON array of records
    #[error("failed to parse feedback JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataError>;
