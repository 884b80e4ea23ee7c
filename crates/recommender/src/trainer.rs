//! Stochastic gradient descent for biased matrix factorization.
//!
//! The trainer learns a global mean, per-user and per-event bias scalars,
//! and K-dimensional latent factor vectors minimizing L2-regularized squared
//! error on the training subset:
//!
//! `pred(u, i) = μ + b_u + b_i + p_u · q_i`
//!
//! One full pass over the (reshuffled) training records per epoch, updating
//! parameters in place after every record. Training is sequential on
//! purpose: the per-record update order is part of the reproducibility
//! contract, so two runs with the same seed, data, and configuration produce
//! the same model.

use std::collections::HashMap;

use tracing::{debug, info};

use feedback_data::{EventId, FeedbackSubset, UserId};

use crate::error::{RecommendError, Result};
use crate::model::Model;
use crate::rng::XorShift64;

/// Hyperparameters for a training run.
///
/// The defaults match the production configuration the feedback model has
/// always been trained with (K=100, 20 epochs, lr 0.005, reg 0.02).
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Latent factor dimensionality (K)
    pub num_factors: usize,
    /// Number of full passes over the training subset
    pub num_epochs: usize,
    /// SGD step size
    pub learning_rate: f64,
    /// L2 regularization strength applied to every updated parameter
    pub regularization: f64,
    /// Seed for factor initialization and the per-epoch reshuffle
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_factors: 100,
            num_epochs: 20,
            learning_rate: 0.005,
            regularization: 0.02,
            seed: 42,
        }
    }
}

impl TrainingConfig {
    /// Reject invalid hyperparameters before any work starts.
    pub fn validate(&self) -> Result<()> {
        if self.num_factors == 0 {
            return Err(RecommendError::Config {
                parameter: "num_factors",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.num_epochs == 0 {
            return Err(RecommendError::Config {
                parameter: "num_epochs",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(RecommendError::Config {
                parameter: "learning_rate",
                reason: format!("must be a positive finite number, got {}", self.learning_rate),
            });
        }
        if !self.regularization.is_finite() || self.regularization < 0.0 {
            return Err(RecommendError::Config {
                parameter: "regularization",
                reason: format!("must be a non-negative finite number, got {}", self.regularization),
            });
        }
        Ok(())
    }
}

/// The matrix-factorization training engine.
pub struct SgdTrainer {
    config: TrainingConfig,
}

impl SgdTrainer {
    /// Create a trainer, validating the configuration up front.
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train a model on the given subset.
    ///
    /// # Errors
    /// * [`RecommendError::Data`] if the training subset is empty
    /// * [`RecommendError::Diverged`] if any parameter goes non-finite; the
    ///   run aborts and no partial model is returned
    pub fn fit(&self, train: &FeedbackSubset) -> Result<Model> {
        let records = train.records();
        if records.is_empty() {
            return Err(feedback_data::DataError::EmptySubset { subset: "training" }.into());
        }

        let cfg = &self.config;
        let k = cfg.num_factors;
        let n = records.len();

        let global_mean = records.iter().map(|r| r.rating).sum::<f64>() / n as f64;

        // Intern entity ids in first-appearance order so initialization is
        // reproducible, and rewrite records as (user slot, item slot, rating).
        let mut users: Vec<UserId> = Vec::new();
        let mut events: Vec<EventId> = Vec::new();
        let mut user_slots: HashMap<UserId, usize> = HashMap::new();
        let mut event_slots: HashMap<EventId, usize> = HashMap::new();
        let mut triples: Vec<(u32, u32, f64)> = Vec::with_capacity(n);
        for record in records {
            let u = match user_slots.get(record.user_id.as_str()) {
                Some(&slot) => slot,
                None => {
                    let slot = users.len();
                    user_slots.insert(record.user_id.clone(), slot);
                    users.push(record.user_id.clone());
                    slot
                }
            };
            let i = match event_slots.get(record.event_id.as_str()) {
                Some(&slot) => slot,
                None => {
                    let slot = events.len();
                    event_slots.insert(record.event_id.clone(), slot);
                    events.push(record.event_id.clone());
                    slot
                }
            };
            triples.push((u as u32, i as u32, record.rating));
        }

        info!(
            "Training on {} records ({} users, {} events), K={}, {} epochs",
            n,
            users.len(),
            events.len(),
            k,
            cfg.num_epochs
        );

        // Flat factor layout: entity `x` owns the slice [x*k, (x+1)*k).
        // Initialization draws uniformly from ±1/√K; biases start at zero.
        let mut rng = XorShift64::new(cfg.seed);
        let scale = 1.0 / (k as f64).sqrt();
        let mut init = |len: usize| -> Vec<f64> {
            (0..len).map(|_| (rng.next_f64() * 2.0 - 1.0) * scale).collect()
        };
        let mut user_factors = init(users.len() * k);
        let mut item_factors = init(events.len() * k);
        let mut user_bias = vec![0.0; users.len()];
        let mut item_bias = vec![0.0; events.len()];

        let lr = cfg.learning_rate;
        let reg = cfg.regularization;
        let mut order: Vec<u32> = (0..n as u32).collect();

        for epoch in 0..cfg.num_epochs {
            XorShift64::new(cfg.seed.wrapping_add(epoch as u64).wrapping_add(999))
                .shuffle(&mut order);

            let mut sse = 0.0;
            for &idx in &order {
                let (u, i, rating) = triples[idx as usize];
                let (u, i) = (u as usize, i as usize);

                let mut dot = 0.0;
                for f in 0..k {
                    dot += user_factors[u * k + f] * item_factors[i * k + f];
                }
                let prediction = global_mean + user_bias[u] + item_bias[i] + dot;
                let error = rating - prediction;
                if !error.is_finite() {
                    return Err(RecommendError::Diverged { epoch });
                }
                sse += error * error;

                user_bias[u] += lr * (error - reg * user_bias[u]);
                item_bias[i] += lr * (error - reg * item_bias[i]);

                // Factor updates read both pre-update vectors before writing,
                // so neither side steps against an already-updated value.
                for f in 0..k {
                    let p = user_factors[u * k + f];
                    let q = item_factors[i * k + f];
                    user_factors[u * k + f] = p + lr * (error * q - reg * p);
                    item_factors[i * k + f] = q + lr * (error * p - reg * q);
                }
            }

            debug!(
                "Epoch {}/{}: train RMSE {:.6}",
                epoch + 1,
                cfg.num_epochs,
                (sse / n as f64).sqrt()
            );
        }

        // A step can overflow a parameter without the error having gone
        // non-finite yet; the completed parameter set must be clean before
        // it is published.
        let all_finite = user_factors
            .iter()
            .chain(item_factors.iter())
            .chain(user_bias.iter())
            .chain(item_bias.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(RecommendError::Diverged { epoch: cfg.num_epochs });
        }

        let user_factor_map: HashMap<UserId, Vec<f64>> = users
            .iter()
            .enumerate()
            .map(|(u, id)| (id.clone(), user_factors[u * k..(u + 1) * k].to_vec()))
            .collect();
        let item_factor_map: HashMap<EventId, Vec<f64>> = events
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), item_factors[i * k..(i + 1) * k].to_vec()))
            .collect();
        let user_bias_map: HashMap<UserId, f64> = users
            .iter()
            .enumerate()
            .map(|(u, id)| (id.clone(), user_bias[u]))
            .collect();
        let item_bias_map: HashMap<EventId, f64> = events
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), item_bias[i]))
            .collect();

        info!("Training complete ({} epochs)", cfg.num_epochs);
        Ok(Model::from_parts(
            global_mean,
            k,
            user_factor_map,
            item_factor_map,
            user_bias_map,
            item_bias_map,
        ))
    }
}
