//! Loading feedback records from the JSON export format.
//!
//! The upstream feedback exporter writes a JSON array of objects with exactly
//! three fields: `userId`, `eventId`, `rating`. This module reads that file
//! into a [`FeedbackDataset`]; how the data was persisted upstream is not
//! this crate's concern.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::types::{FeedbackDataset, FeedbackRecord};

/// Parse feedback records from a JSON string.
pub fn records_from_json(json: &str) -> Result<Vec<FeedbackRecord>> {
    let records: Vec<FeedbackRecord> = serde_json::from_str(json)?;
    Ok(records)
}

impl FeedbackDataset {
    /// Load a dataset from a feedback export file.
    ///
    /// # Errors
    /// Fails with [`crate::DataError`] if the file cannot be read, is not a
    /// JSON array of records, or contains no records.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let records = records_from_json(&json)?;
        let dataset = Self::from_records(records)?;

        let (users, events, count) = dataset.counts();
        info!(
            "Loaded {} feedback records ({} users, {} events) from {}",
            count,
            users,
            events,
            path.display()
        );
        Ok(dataset)
    }
}
