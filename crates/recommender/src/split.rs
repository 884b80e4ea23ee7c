//! Deterministic train/test splitting of a feedback dataset.
//!
//! The split permutes record indices with a seeded Fisher–Yates shuffle and
//! carves off the first `⌊n · test_fraction⌋` indices as the test subset.
//! For a fixed seed and dataset the partition is exactly reproducible across
//! runs.

use feedback_data::{FeedbackDataset, FeedbackSubset};
use tracing::debug;

use crate::error::{RecommendError, Result};
use crate::rng::XorShift64;

/// Partition a dataset into (train, test) subsets.
///
/// The two subsets are disjoint and together cover every record:
/// `train.len() + test.len() == dataset.len()`.
///
/// # Arguments
/// * `dataset` - The full feedback dataset
/// * `test_fraction` - Fraction of records held out for testing, in (0, 1)
/// * `seed` - Seed for the shuffle; same seed, same split
///
/// # Errors
/// Returns [`RecommendError::Config`] if `test_fraction` is outside (0, 1).
pub fn split(
    dataset: &FeedbackDataset,
    test_fraction: f64,
    seed: u64,
) -> Result<(FeedbackSubset, FeedbackSubset)> {
    if !test_fraction.is_finite() || test_fraction <= 0.0 || test_fraction >= 1.0 {
        return Err(RecommendError::Config {
            parameter: "test_fraction",
            reason: format!("must be in (0, 1), got {test_fraction}"),
        });
    }

    let records = dataset.records();
    let n = records.len();

    let mut order: Vec<usize> = (0..n).collect();
    XorShift64::new(seed).shuffle(&mut order);

    // Integer truncation: a tiny dataset can end up with an empty test
    // subset, which the evaluator rejects rather than dividing by zero.
    let test_len = (n as f64 * test_fraction) as usize;

    let test: Vec<_> = order[..test_len]
        .iter()
        .map(|&idx| records[idx].clone())
        .collect();
    let train: Vec<_> = order[test_len..]
        .iter()
        .map(|&idx| records[idx].clone())
        .collect();

    debug!(
        "Split {} records into {} train / {} test (fraction {}, seed {})",
        n,
        train.len(),
        test.len(),
        test_fraction,
        seed
    );
    Ok((FeedbackSubset::new(train), FeedbackSubset::new(test)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_data::FeedbackRecord;

    fn dataset(n: usize) -> FeedbackDataset {
        let records = (0..n)
            .map(|i| FeedbackRecord::new(format!("u{}", i % 7), format!("e{}", i % 11), 1.0 + (i % 5) as f64))
            .collect();
        FeedbackDataset::from_records(records).unwrap()
    }

    #[test]
    fn test_sizes_sum_to_dataset_size() {
        let dataset = dataset(100);
        let (train, test) = split(&dataset, 0.2, 42).unwrap();

        assert_eq!(train.len() + test.len(), dataset.len());
        assert_eq!(test.len(), 20);
    }

    #[test]
    fn test_subsets_are_disjoint_and_cover_all_records() {
        let records: Vec<FeedbackRecord> = (0..50)
            .map(|i| FeedbackRecord::new(format!("u{i}"), format!("e{i}"), 3.0))
            .collect();
        let dataset = FeedbackDataset::from_records(records).unwrap();
        let (train, test) = split(&dataset, 0.3, 7).unwrap();

        // Each record carries a unique user id here, so ids identify records
        let mut seen: Vec<&str> = train
            .records()
            .iter()
            .chain(test.records())
            .map(|r| r.user_id.as_str())
            .collect();
        let total = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total, "no record may land in both subsets");
        assert_eq!(total, dataset.len());
    }

    #[test]
    fn test_same_seed_reproduces_split() {
        let dataset = dataset(64);
        let (train_a, test_a) = split(&dataset, 0.25, 1234).unwrap();
        let (train_b, test_b) = split(&dataset, 0.25, 1234).unwrap();

        assert_eq!(train_a.records(), train_b.records());
        assert_eq!(test_a.records(), test_b.records());
    }

    #[test]
    fn test_different_seed_changes_split() {
        let dataset = dataset(64);
        let (_, test_a) = split(&dataset, 0.25, 1).unwrap();
        let (_, test_b) = split(&dataset, 0.25, 2).unwrap();

        assert_ne!(test_a.records(), test_b.records());
    }

    #[test]
    fn test_invalid_fraction_is_a_config_error() {
        let dataset = dataset(10);
        for fraction in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let result = split(&dataset, fraction, 42);
            assert!(
                matches!(result, Err(RecommendError::Config { parameter: "test_fraction", .. })),
                "fraction {fraction} should be rejected"
            );
        }
    }

    #[test]
    fn test_tiny_dataset_may_produce_empty_test_subset() {
        let dataset = dataset(3);
        let (train, test) = split(&dataset, 0.2, 42).unwrap();

        assert_eq!(test.len(), 0);
        assert_eq!(train.len(), 3);
    }
}
