//! # Recommendation Service
//!
//! The service object the external API layer calls into. It owns exactly one
//! replaceable reference to an immutable model snapshot:
//!
//! 1. Training (elsewhere, offline) produces a `Model`
//! 2. `install` wraps model + catalog into a snapshot and swaps the reference
//! 3. Requests clone the current `Arc` and score against it
//!
//! Concurrent readers never synchronize with each other — a snapshot is
//! never mutated, only replaced wholesale, so every request observes either
//! the fully-old or the fully-new model.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::{debug, info};

use feedback_data::EventId;
use recommender::{top_n, Model, PredictionResult};

use crate::catalog::EventCatalog;
use crate::error::{Result, ServingError};

/// One immutable generation of serving state: the trained model plus the
/// event catalog it was trained alongside.
#[derive(Debug)]
pub struct ModelSnapshot {
    pub model: Model,
    pub catalog: EventCatalog,
}

/// Result of a health probe.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub model_loaded: bool,
}

/// Serves predictions and rankings from the currently installed snapshot.
pub struct RecommenderService {
    snapshot: RwLock<Option<Arc<ModelSnapshot>>>,
}

impl RecommenderService {
    /// Create a service with no model loaded. Requests fail with
    /// [`ServingError::ModelUnavailable`] until [`install`](Self::install)
    /// is called.
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(None),
        }
    }

    /// Atomically swap in a freshly trained model and its catalog.
    pub fn install(&self, model: Model, catalog: EventCatalog) {
        let snapshot = Arc::new(ModelSnapshot { model, catalog });
        info!(
            "Installing model snapshot ({} catalogued events)",
            snapshot.catalog.len()
        );
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }

    /// Load model and catalog artifacts from disk and install them.
    pub fn install_from_files(&self, model_path: &Path, catalog_path: &Path) -> Result<()> {
        let model = Model::load_from_file(model_path)?;
        let catalog = EventCatalog::load_from_file(catalog_path)?;
        self.install(model, catalog);
        Ok(())
    }

    fn current(&self) -> Option<Arc<ModelSnapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rank events for a user by predicted rating.
    ///
    /// # Arguments
    /// * `user_id` - The user to recommend for (cold-start users are fine)
    /// * `candidates` - Optional candidate restriction; `None` considers the
    ///   whole catalog, `Some` is intersected with it (unknown ids dropped)
    /// * `limit` - Maximum number of recommendations
    ///
    /// # Errors
    /// * [`ServingError::ModelUnavailable`] if no snapshot is installed
    /// * [`recommender::RecommendError::NoCandidates`] if the candidate set
    ///   is empty after restriction
    pub async fn get_recommendations(
        &self,
        user_id: &str,
        candidates: Option<Vec<EventId>>,
        limit: usize,
    ) -> Result<Vec<PredictionResult>> {
        let snapshot = self.current().ok_or(ServingError::ModelUnavailable)?;

        let candidate_ids = match candidates {
            Some(requested) => snapshot.catalog.restrict_to(&requested),
            None => snapshot.catalog.all_event_ids(),
        };
        debug!(
            "Scoring {} candidates for user {}",
            candidate_ids.len(),
            user_id
        );

        // Scoring the whole catalog is CPU-bound; keep it off the runtime
        // threads, the snapshot Arc travels into the blocking task.
        let user = user_id.to_string();
        let ranked = tokio::task::spawn_blocking(move || {
            top_n(&snapshot.model, &user, &candidate_ids, limit)
        })
        .await??;

        info!(
            "Returning {} recommendations for user {}",
            ranked.len(),
            user_id
        );
        Ok(ranked)
    }

    /// Report whether a model snapshot is installed and serving.
    pub fn health_check(&self) -> HealthStatus {
        HealthStatus {
            model_loaded: self.current().is_some(),
        }
    }
}

impl Default for RecommenderService {
    fn default() -> Self {
        Self::new()
    }
}
