//! # Recommender Crate
//!
//! The collaborative-filtering core: a latent-factor rating model trained by
//! stochastic gradient descent over explicit (user, event, rating) feedback.
//!
//! ## Components
//!
//! - **split**: Deterministic, seed-controlled train/test partition
//! - **trainer**: SGD engine for biased matrix factorization
//! - **model**: The trained artifact — prediction with cold-start fallback,
//!   JSON persistence
//! - **eval**: RMSE against held-out ratings
//! - **rank**: Top-N candidate ranking with a deterministic tie-break
//! - **rng**: Seeded generator backing every random choice in this crate
//!
//! ## Example Usage
//!
//! ```ignore
//! use feedback_data::FeedbackDataset;
//! use recommender::{split, SgdTrainer, TrainingConfig, rmse, top_n};
//!
//! let dataset = FeedbackDataset::from_json_file("data/feedback_data.json".as_ref())?;
//! let (train, test) = split(&dataset, 0.2, 42)?;
//!
//! let trainer = SgdTrainer::new(TrainingConfig::default())?;
//! let model = trainer.fit(&train)?;
//! println!("test RMSE: {:.4}", rmse(&model, &test)?);
//!
//! let ranked = top_n(&model, "u42", &candidates, 5)?;
//! ```
//!
//! ## Determinism
//!
//! Given identical data, seed, and configuration, two training runs produce
//! models whose predictions agree to within 1e-9. Serving reads are free of
//! synchronization concerns: a [`Model`] is immutable from the moment
//! [`SgdTrainer::fit`] returns it.

// Public modules
pub mod error;
pub mod eval;
pub mod model;
pub mod rank;
pub mod rng;
pub mod split;
pub mod trainer;

// Re-export commonly used types for convenience
pub use error::{RecommendError, Result};
pub use eval::rmse;
pub use model::{Model, PredictionResult};
pub use rank::top_n;
pub use split::split;
pub use trainer::{SgdTrainer, TrainingConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_data::{FeedbackDataset, FeedbackRecord};

    /// The reference end-to-end scenario: five feedback records, a 0.2/42
    /// split, and a small model trained long enough to beat the loose RMSE
    /// sanity bound.
    #[test]
    fn test_end_to_end_training_scenario() {
        let dataset = FeedbackDataset::from_records(vec![
            FeedbackRecord::new("u1", "e1", 5.0),
            FeedbackRecord::new("u1", "e2", 3.0),
            FeedbackRecord::new("u2", "e1", 4.0),
            FeedbackRecord::new("u2", "e2", 5.0),
            FeedbackRecord::new("u3", "e1", 2.0),
        ])
        .unwrap();

        let (train, test) = split(&dataset, 0.2, 42).unwrap();
        assert_eq!(train.len() + test.len(), dataset.len());
        assert_eq!(test.len(), 1);

        let config = TrainingConfig {
            num_factors: 2,
            num_epochs: 50,
            learning_rate: 0.01,
            regularization: 0.02,
            seed: 42,
        };
        let model = SgdTrainer::new(config).unwrap().fit(&train).unwrap();

        let rmse = rmse(&model, &test).unwrap();
        assert!(rmse.is_finite());
        assert!(rmse >= 0.0);
        assert!(rmse < 2.0, "test RMSE {rmse} exceeds the sanity bound");
    }

    /// Serialization round-trip at the artifact level: a reloaded model
    /// predicts identically for trained and cold-start pairs alike.
    #[test]
    fn test_artifact_round_trip_preserves_all_prediction_paths() {
        let train = feedback_data::FeedbackSubset::new(vec![
            FeedbackRecord::new("u1", "e1", 5.0),
            FeedbackRecord::new("u1", "e2", 3.0),
            FeedbackRecord::new("u2", "e1", 4.0),
        ]);
        let config = TrainingConfig {
            num_factors: 3,
            num_epochs: 10,
            ..TrainingConfig::default()
        };
        let model = SgdTrainer::new(config).unwrap().fit(&train).unwrap();

        let json = serde_json::to_string(&model).unwrap();
        let restored: Model = serde_json::from_str(&json).unwrap();

        for (user, event) in [
            ("u1", "e1"),
            ("u2", "e2"),
            ("u1", "never-seen"),
            ("never-seen", "e1"),
            ("never-seen", "never-seen"),
        ] {
            assert_eq!(
                model.predict(user, event),
                restored.predict(user, event),
                "round-trip drift for ({user}, {event})"
            );
        }
    }
}
