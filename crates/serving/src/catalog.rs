//! The event catalog: a per-event metadata index built once and queried by
//! direct lookup.
//!
//! Candidate resolution at serving time is either "all catalogued events" or
//! a set-intersection of the caller's requested ids with the catalog. There
//! is no row-filtering abstraction behind this — just a map.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use feedback_data::{EventId, FeedbackDataset};

use crate::error::Result;

/// Aggregate feedback statistics for one event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub rating_count: u32,
    pub mean_rating: f64,
}

/// Index of every event seen in the feedback data.
///
/// Built once from a dataset and persisted next to the model artifact, so
/// the serving process can resolve candidate sets without the training data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCatalog {
    events: HashMap<EventId, EventStats>,
}

impl EventCatalog {
    /// Build the catalog from a feedback dataset.
    pub fn from_dataset(dataset: &FeedbackDataset) -> Self {
        let mut sums: HashMap<EventId, (u32, f64)> = HashMap::new();
        for record in dataset.records() {
            let entry = sums.entry(record.event_id.clone()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += record.rating;
        }

        let events = sums
            .into_iter()
            .map(|(event_id, (count, sum))| {
                (
                    event_id,
                    EventStats {
                        rating_count: count,
                        mean_rating: sum / count as f64,
                    },
                )
            })
            .collect();
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.events.contains_key(event_id)
    }

    /// Statistics for a catalogued event
    pub fn stats(&self, event_id: &str) -> Option<&EventStats> {
        self.events.get(event_id)
    }

    /// All catalogued event ids (no defined order)
    pub fn all_event_ids(&self) -> Vec<EventId> {
        self.events.keys().cloned().collect()
    }

    /// Intersect a requested candidate list with the catalog.
    ///
    /// Preserves the request order; ids the catalog has never seen are
    /// dropped, the same way the upstream API only considered known events.
    pub fn restrict_to(&self, requested: &[EventId]) -> Vec<EventId> {
        requested
            .iter()
            .filter(|id| self.events.contains_key(id.as_str()))
            .cloned()
            .collect()
    }

    /// Persist the catalog as a JSON artifact.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        info!("Saved catalog of {} events to {}", self.events.len(), path.display());
        Ok(())
    }

    /// Load a catalog from a JSON artifact.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let catalog: Self = serde_json::from_str(&json)?;
        info!(
            "Loaded catalog of {} events from {}",
            catalog.events.len(),
            path.display()
        );
        Ok(catalog)
    }
}
