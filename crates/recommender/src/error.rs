//! Error types for the recommender core.

use thiserror::Error;

use feedback_data::DataError;

/// Errors surfaced by the splitter, trainer, evaluator, and ranker.
///
/// Everything here is reported synchronously to the caller. A diverged
/// training run is never retried by the core: the same configuration would
/// diverge again.
#[derive(Error, Debug)]
pub enum RecommendError {
    /// Invalid hyperparameter or split configuration, rejected before any work starts
    #[error("invalid value for {parameter}: {reason}")]
    Config {
        parameter: &'static str,
        reason: String,
    },

    /// Malformed or empty input data
    #[error(transparent)]
    Data(#[from] DataError),

    /// Numerical instability during optimization; no partial model is published
    #[error("training diverged: non-finite parameter update at epoch {epoch}")]
    Diverged { epoch: usize },

    /// A ranking query was left with no usable candidate events
    #[error("no candidate events to rank for user {user_id}")]
    NoCandidates { user_id: String },

    /// I/O error while reading or writing a model artifact
    #[error("failed to access model artifact: {0}")]
    Io(#[from] std::io::Error),

    /// Model artifact couldn't be encoded or decoded
    #[error("failed to encode or decode model artifact: {0}")]
    Artifact(#[from] serde_json::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecommendError>;
