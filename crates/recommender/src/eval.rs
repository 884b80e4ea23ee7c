//! Model accuracy evaluation on held-out feedback.

use feedback_data::{DataError, FeedbackSubset};
use tracing::info;

use crate::error::Result;
use crate::model::Model;

/// Root-mean-squared error of the model's predictions on a test subset.
///
/// # Errors
/// Returns a [`DataError`] for an empty test subset; a mean over zero
/// records is never computed silently.
pub fn rmse(model: &Model, test: &FeedbackSubset) -> Result<f64> {
    if test.is_empty() {
        return Err(DataError::EmptySubset { subset: "test" }.into());
    }

    let sse: f64 = test
        .records()
        .iter()
        .map(|record| {
            let error = record.rating - model.predict(&record.user_id, &record.event_id);
            error * error
        })
        .sum();
    let rmse = (sse / test.len() as f64).sqrt();

    info!("RMSE over {} test records: {:.4}", test.len(), rmse);
    Ok(rmse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecommendError;
    use crate::trainer::{SgdTrainer, TrainingConfig};
    use feedback_data::FeedbackRecord;

    fn subset(records: &[(&str, &str, f64)]) -> FeedbackSubset {
        FeedbackSubset::new(
            records
                .iter()
                .map(|(u, e, r)| FeedbackRecord::new(*u, *e, *r))
                .collect(),
        )
    }

    fn trained_model() -> Model {
        let train = subset(&[
            ("u1", "e1", 5.0),
            ("u1", "e2", 3.0),
            ("u2", "e1", 4.0),
            ("u2", "e2", 5.0),
        ]);
        let config = TrainingConfig {
            num_factors: 2,
            num_epochs: 30,
            learning_rate: 0.01,
            ..TrainingConfig::default()
        };
        SgdTrainer::new(config).unwrap().fit(&train).unwrap()
    }

    #[test]
    fn test_rmse_is_finite_and_non_negative() {
        let model = trained_model();
        let test = subset(&[("u1", "e1", 5.0), ("u3", "e2", 4.0)]);

        let rmse = rmse(&model, &test).unwrap();
        assert!(rmse.is_finite());
        assert!(rmse >= 0.0);
    }

    #[test]
    fn test_rmse_matches_hand_computation() {
        let model = trained_model();
        let test = subset(&[("u1", "e1", 5.0), ("u2", "e2", 5.0)]);

        let e1 = 5.0 - model.predict("u1", "e1");
        let e2 = 5.0 - model.predict("u2", "e2");
        let expected = ((e1 * e1 + e2 * e2) / 2.0).sqrt();

        assert_eq!(rmse(&model, &test).unwrap(), expected);
    }

    #[test]
    fn test_empty_test_subset_is_a_data_error() {
        let model = trained_model();
        let result = rmse(&model, &FeedbackSubset::new(vec![]));
        assert!(matches!(result, Err(RecommendError::Data(_))));
    }
}
