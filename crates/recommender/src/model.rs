//! The trained matrix-factorization model and its persisted form.
//!
//! A model is created atomically at the end of a training run and never
//! mutated afterwards; a newer model replaces it wholesale. The persisted
//! artifact is the normalized parameter set itself (no opaque object graph),
//! encoded as JSON: loading is a plain field-by-field reconstruction and
//! round-trips to identical predictions.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use feedback_data::{EventId, UserId};

use crate::error::Result;

/// A predicted rating for one (user, event) pair.
///
/// Value object, produced fresh per query; this is also the serving
/// response row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub user_id: UserId,
    pub event_id: EventId,
    pub predicted_rating: f64,
}

/// Trained biased matrix-factorization parameters.
///
/// Invariants: the key sets of `user_factors` and `user_bias` agree (same
/// for items), and every factor vector has length `num_factors`. Users and
/// events unseen in training have no entry at all — prediction falls back to
/// the cold-start path instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    global_mean: f64,
    num_factors: usize,
    user_factors: HashMap<UserId, Vec<f64>>,
    item_factors: HashMap<EventId, Vec<f64>>,
    user_bias: HashMap<UserId, f64>,
    item_bias: HashMap<EventId, f64>,
}

impl Model {
    pub(crate) fn from_parts(
        global_mean: f64,
        num_factors: usize,
        user_factors: HashMap<UserId, Vec<f64>>,
        item_factors: HashMap<EventId, Vec<f64>>,
        user_bias: HashMap<UserId, f64>,
        item_bias: HashMap<EventId, f64>,
    ) -> Self {
        debug_assert!(user_factors.len() == user_bias.len());
        debug_assert!(item_factors.len() == item_bias.len());
        Self {
            global_mean,
            num_factors,
            user_factors,
            item_factors,
            user_bias,
            item_bias,
        }
    }

    /// Mean rating over the training subset
    pub fn global_mean(&self) -> f64 {
        self.global_mean
    }

    /// Latent factor dimensionality (K)
    pub fn num_factors(&self) -> usize {
        self.num_factors
    }

    /// Whether the user was seen in training
    pub fn knows_user(&self, user_id: &str) -> bool {
        self.user_factors.contains_key(user_id)
    }

    /// Whether the event was seen in training
    pub fn knows_event(&self, event_id: &str) -> bool {
        self.item_factors.contains_key(event_id)
    }

    /// Learned bias for an event, if it was seen in training
    pub fn item_bias(&self, event_id: &str) -> Option<f64> {
        self.item_bias.get(event_id).copied()
    }

    /// Learned bias for a user, if they were seen in training
    pub fn user_bias(&self, user_id: &str) -> Option<f64> {
        self.user_bias.get(user_id).copied()
    }

    /// Predict the rating `user_id` would give `event_id`.
    ///
    /// Cold start is not an error: an unknown user contributes neither bias
    /// nor factor terms, so the prediction degrades to
    /// `global_mean + item_bias` (known event), `global_mean + user_bias`
    /// (known user), or the plain `global_mean` when both are unknown.
    /// Predictions are not clamped to the [1, 5] rating convention; clamping
    /// is a caller-side concern.
    pub fn predict(&self, user_id: &str, event_id: &str) -> f64 {
        let mut prediction = self.global_mean;
        if let Some(bias) = self.user_bias.get(user_id) {
            prediction += bias;
        }
        if let Some(bias) = self.item_bias.get(event_id) {
            prediction += bias;
        }
        if let (Some(user_vec), Some(item_vec)) =
            (self.user_factors.get(user_id), self.item_factors.get(event_id))
        {
            prediction += dot(user_vec, item_vec);
        }
        prediction
    }

    /// Predict and wrap the result as a [`PredictionResult`].
    pub fn predict_result(&self, user_id: &str, event_id: &str) -> PredictionResult {
        PredictionResult {
            user_id: user_id.to_string(),
            event_id: event_id.to_string(),
            predicted_rating: self.predict(user_id, event_id),
        }
    }

    /// Serialize the model to a JSON artifact.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        info!(
            "Saved model ({} users, {} events, K={}) to {}",
            self.user_factors.len(),
            self.item_factors.len(),
            self.num_factors,
            path.display()
        );
        Ok(())
    }

    /// Reconstruct a model from a JSON artifact.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&json)?;
        info!(
            "Loaded model ({} users, {} events, K={}) from {}",
            model.user_factors.len(),
            model.item_factors.len(),
            model.num_factors,
            path.display()
        );
        Ok(model)
    }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
