//! Core domain types for explicit event feedback.
//!
//! This module defines the record and dataset structures shared by the
//! trainer, evaluator, and serving layers. A dataset is built once from a
//! sequence of records and is read-only afterwards; the derived per-user and
//! per-event indices are the only lookup structures the rest of the system
//! needs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{DataError, Result};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user (opaque string from the upstream store)
pub type UserId = String;

/// Unique identifier for an event (opaque string from the upstream store)
pub type EventId = String;

// =============================================================================
// FeedbackRecord
// =============================================================================

/// A single explicit rating a user gave an event.
///
/// Ratings are conventionally in the closed interval [1, 5]; the convention
/// is a precondition of the input data and is not enforced here.
///
/// Serialized field names (`userId`, `eventId`, `rating`) match the upstream
/// feedback export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub user_id: UserId,
    pub event_id: EventId,
    pub rating: f64,
}

impl FeedbackRecord {
    pub fn new(user_id: impl Into<UserId>, event_id: impl Into<EventId>, rating: f64) -> Self {
        Self {
            user_id: user_id.into(),
            event_id: event_id.into(),
            rating,
        }
    }
}

// =============================================================================
// FeedbackDataset
// =============================================================================

/// Immutable in-memory collection of feedback records plus derived indices.
///
/// Invariant: every record index appears in exactly one user bucket and one
/// event bucket. There are no mutation operations after construction; the
/// splitter and trainer only ever read from it.
#[derive(Debug)]
pub struct FeedbackDataset {
    records: Vec<FeedbackRecord>,

    /// All record indices for each user
    user_index: HashMap<UserId, Vec<usize>>,
    /// All record indices for each event
    event_index: HashMap<EventId, Vec<usize>>,
}

impl FeedbackDataset {
    /// Build a dataset from a sequence of records.
    ///
    /// # Errors
    /// Returns [`DataError::EmptyDataset`] if `records` is empty — training
    /// cannot proceed with zero examples.
    pub fn from_records(records: Vec<FeedbackRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(DataError::EmptyDataset);
        }

        let mut user_index: HashMap<UserId, Vec<usize>> = HashMap::new();
        let mut event_index: HashMap<EventId, Vec<usize>> = HashMap::new();
        for (idx, record) in records.iter().enumerate() {
            user_index
                .entry(record.user_id.clone())
                .or_default()
                .push(idx);
            event_index
                .entry(record.event_id.clone())
                .or_default()
                .push(idx);
        }

        Ok(Self {
            records,
            user_index,
            event_index,
        })
    }

    /// Number of feedback records in the dataset
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in construction order
    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    /// All (event, rating) pairs a user has submitted.
    ///
    /// Returns an empty vector for an unknown user.
    pub fn ratings_for_user(&self, user_id: &str) -> Vec<(&str, f64)> {
        self.user_index
            .get(user_id)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&idx| {
                        let record = &self.records[idx];
                        (record.event_id.as_str(), record.rating)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Iterator over the distinct user ids present in the dataset
    pub fn user_ids(&self) -> impl Iterator<Item = &str> {
        self.user_index.keys().map(String::as_str)
    }

    /// Iterator over the distinct event ids present in the dataset
    pub fn event_ids(&self) -> impl Iterator<Item = &str> {
        self.event_index.keys().map(String::as_str)
    }

    /// Counts for logging/validation: (users, events, records)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.user_index.len(), self.event_index.len(), self.records.len())
    }
}

// =============================================================================
// FeedbackSubset
// =============================================================================

/// An ordered slice of feedback produced by a train/test split.
///
/// Unlike [`FeedbackDataset`], a subset may be empty — the consumer decides
/// whether that is an error (the trainer and evaluator both reject empty
/// subsets).
#[derive(Debug, Clone)]
pub struct FeedbackSubset {
    records: Vec<FeedbackRecord>,
}

impl FeedbackSubset {
    pub fn new(records: Vec<FeedbackRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in split order
    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }
}
