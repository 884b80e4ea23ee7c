//! Top-N candidate ranking by predicted rating.

use rayon::prelude::*;
use tracing::debug;

use feedback_data::EventId;

use crate::error::{RecommendError, Result};
use crate::model::{Model, PredictionResult};

/// Rank candidate events for a user by predicted rating.
///
/// Every candidate is scored (candidates unseen in training score through
/// the cold-start path), then sorted descending by predicted rating. Exact
/// ties are broken by ascending `event_id`, so the ordering is fully
/// deterministic regardless of the candidate order passed in.
///
/// # Arguments
/// * `model` - The trained model to score with
/// * `user_id` - The user to rank for (may be unknown to the model)
/// * `candidates` - Candidate event ids; scored as given, no filtering
/// * `n` - Maximum number of results; the output has `min(n, candidates)` rows
///
/// # Errors
/// Returns [`RecommendError::NoCandidates`] for an empty candidate set — a
/// caller expecting content never silently receives an empty list.
pub fn top_n(
    model: &Model,
    user_id: &str,
    candidates: &[EventId],
    n: usize,
) -> Result<Vec<PredictionResult>> {
    if candidates.is_empty() {
        return Err(RecommendError::NoCandidates {
            user_id: user_id.to_string(),
        });
    }

    let mut predictions: Vec<PredictionResult> = candidates
        .par_iter()
        .map(|event_id| model.predict_result(user_id, event_id))
        .collect();

    predictions.sort_by(|a, b| {
        b.predicted_rating
            .partial_cmp(&a.predicted_rating)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.event_id.cmp(&b.event_id))
    });
    predictions.truncate(n);

    debug!(
        "Ranked {} candidates for user {}, returning {}",
        candidates.len(),
        user_id,
        predictions.len()
    );
    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Model whose predictions are `global_mean + item_bias` for every user,
    /// so each candidate's score is fixed by construction.
    fn model_with_item_scores(scores: &[(&str, f64)]) -> Model {
        let global_mean = 3.0;
        let item_bias: HashMap<String, f64> = scores
            .iter()
            .map(|(id, score)| (id.to_string(), score - global_mean))
            .collect();
        let item_factors: HashMap<String, Vec<f64>> = scores
            .iter()
            .map(|(id, _)| (id.to_string(), vec![0.0, 0.0]))
            .collect();
        Model::from_parts(
            global_mean,
            2,
            HashMap::new(),
            item_factors,
            HashMap::new(),
            item_bias,
        )
    }

    fn ids(ids: &[&str]) -> Vec<EventId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_orders_by_predicted_rating_descending() {
        let model = model_with_item_scores(&[("low", 2.0), ("high", 4.8), ("mid", 3.5)]);
        let ranked = top_n(&model, "anyone", &ids(&["low", "high", "mid"]), 10).unwrap();

        let order: Vec<&str> = ranked.iter().map(|p| p.event_id.as_str()).collect();
        assert_eq!(order, vec!["high", "mid", "low"]);
        assert_eq!(ranked[0].predicted_rating, 4.8);
    }

    #[test]
    fn test_exact_ties_break_by_ascending_event_id() {
        // A and B tie at 4.5; C trails at 3.0. top 2 must be [A, B].
        let model = model_with_item_scores(&[("A", 4.5), ("B", 4.5), ("C", 3.0)]);
        let ranked = top_n(&model, "u1", &ids(&["C", "B", "A"]), 2).unwrap();

        let order: Vec<&str> = ranked.iter().map(|p| p.event_id.as_str()).collect();
        assert_eq!(order, vec!["A", "B"]);
    }

    #[test]
    fn test_result_length_is_min_of_n_and_candidates() {
        let model = model_with_item_scores(&[("A", 4.0), ("B", 3.0)]);

        let ranked = top_n(&model, "u1", &ids(&["A", "B"]), 5).unwrap();
        assert_eq!(ranked.len(), 2);

        let ranked = top_n(&model, "u1", &ids(&["A", "B"]), 1).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].event_id, "A");
    }

    #[test]
    fn test_unknown_candidates_score_via_cold_start() {
        let model = model_with_item_scores(&[("known", 4.0)]);
        let ranked = top_n(&model, "u1", &ids(&["known", "unknown"]), 10).unwrap();

        assert_eq!(ranked[0].event_id, "known");
        assert_eq!(ranked[1].event_id, "unknown");
        assert_eq!(ranked[1].predicted_rating, model.global_mean());
    }

    #[test]
    fn test_empty_candidates_is_a_not_found_error() {
        let model = model_with_item_scores(&[("A", 4.0)]);
        let result = top_n(&model, "u1", &[], 5);
        assert!(matches!(
            result,
            Err(RecommendError::NoCandidates { user_id }) if user_id == "u1"
        ));
    }

    #[test]
    fn test_candidate_input_order_does_not_matter() {
        let model = model_with_item_scores(&[("A", 4.5), ("B", 4.5), ("C", 3.0)]);
        let forward = top_n(&model, "u1", &ids(&["A", "B", "C"]), 3).unwrap();
        let backward = top_n(&model, "u1", &ids(&["C", "B", "A"]), 3).unwrap();
        assert_eq!(forward, backward);
    }
}
