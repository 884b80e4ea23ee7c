//! # Feedback Data Crate
//!
//! This crate holds the feedback domain types and loads the upstream JSON
//! feedback export into an immutable, indexed dataset.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (FeedbackRecord, FeedbackDataset, FeedbackSubset)
//! - **loader**: Parse the JSON feedback export into records
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use feedback_data::FeedbackDataset;
//! use std::path::Path;
//!
//! // Load the feedback export
//! let dataset = FeedbackDataset::from_json_file(Path::new("data/feedback_data.json"))?;
//!
//! // Query data
//! let ratings = dataset.ratings_for_user("u42");
//! println!("user u42 rated {} events", ratings.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod loader;

// Re-export commonly used types for convenience
pub use error::{DataError, Result};
pub use loader::records_from_json;
pub use types::{
    // Type aliases
    UserId,
    EventId,
    // Core types
    FeedbackRecord,
    FeedbackDataset,
    FeedbackSubset,
};
