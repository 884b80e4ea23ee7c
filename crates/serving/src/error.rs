//! Error types for the serving crate.

use thiserror::Error;

use recommender::RecommendError;

/// Errors surfaced by the recommendation service.
#[derive(Error, Debug)]
pub enum ServingError {
    /// Serving was attempted before any model snapshot was installed.
    ///
    /// This is the explicit "unavailable" signal: a caller never receives a
    /// stale or garbage prediction in place of it.
    #[error("no trained model is loaded")]
    ModelUnavailable,

    /// An error from the recommender core (no candidates, data problems, …)
    #[error(transparent)]
    Recommend(#[from] RecommendError),

    /// The blocking scoring task was cancelled or panicked
    #[error("recommendation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// I/O error while reading or writing a catalog artifact
    #[error("failed to access catalog artifact: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog artifact couldn't be encoded or decoded
    #[error("failed to encode or decode catalog artifact: {0}")]
    Artifact(#[from] serde_json::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ServingError>;
