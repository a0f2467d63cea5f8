//! Deterministic train/test partitioning
//!
//! The split shuffles row indices with a seeded [`StdRng`] and carves off
//! the holdout from the front. Same data + same seed = same partition, so
//! repeated runs evaluate on identical holdout rows.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::{DataError, Result, TabularData};

/// Holdout share used by the training routine unless overridden
pub const DEFAULT_TEST_FRACTION: f64 = 0.30;

/// Shuffle seed used by the training routine unless overridden
pub const DEFAULT_SPLIT_SEED: u64 = 0;

/// A train/test partition of a [`TabularData`]
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

impl Split {
    /// Number of training rows
    #[must_use]
    pub fn n_train(&self) -> usize {
        self.x_train.nrows()
    }

    /// Number of test rows
    #[must_use]
    pub fn n_test(&self) -> usize {
        self.x_test.nrows()
    }
}

/// Compute the shuffled index partition without copying any rows
///
/// Returns `(train_indices, test_indices)`. The test side takes
/// `round(n * test_fraction)` rows. Errors if the fraction is outside
/// (0, 1) or if either side would end up empty.
pub fn split_indices(n: usize, test_fraction: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(DataError::InvalidSplitFraction(test_fraction));
    }
    let test_count = (n as f64 * test_fraction).round() as usize;
    if test_count == 0 || test_count >= n {
        return Err(DataError::TooFewRows(n));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(test_count);
    Ok((train, indices))
}

/// Partition a table into train and test sets
///
/// Deterministic for a given `(data, test_fraction, seed)` triple.
pub fn train_test_split(data: &TabularData, test_fraction: f64, seed: u64) -> Result<Split> {
    let (train_idx, test_idx) = split_indices(data.n_rows(), test_fraction, seed)?;
    Ok(Split {
        x_train: data.features.select(Axis(0), &train_idx),
        x_test: data.features.select(Axis(0), &test_idx),
        y_train: data.labels.select(Axis(0), &train_idx),
        y_test: data.labels.select(Axis(0), &test_idx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn table(n: usize) -> TabularData {
        // Row i carries the value i in every cell so we can trace rows
        // through the shuffle.
        let features = Array2::from_shape_fn((n, 8), |(i, _)| i as f64);
        let labels = Array1::from_shape_fn(n, |i| (i % 2) as f64);
        TabularData {
            features,
            labels,
            source: PathBuf::from("synthetic"),
        }
    }

    #[test]
    fn test_split_is_deterministic() {
        let data = table(100);
        let a = train_test_split(&data, 0.30, 0).expect("split");
        let b = train_test_split(&data, 0.30, 0).expect("split");
        assert_eq!(a.x_train, b.x_train);
        assert_eq!(a.x_test, b.x_test);
        assert_eq!(a.y_train, b.y_train);
        assert_eq!(a.y_test, b.y_test);
    }

    #[test]
    fn test_different_seeds_differ() {
        let data = table(100);
        let a = train_test_split(&data, 0.30, 0).expect("split");
        let b = train_test_split(&data, 0.30, 1).expect("split");
        assert_ne!(a.x_test, b.x_test);
    }

    #[test]
    fn test_768_rows_split_538_230() {
        let data = table(768);
        let split = train_test_split(&data, 0.30, 0).expect("split");
        assert_eq!(split.n_train(), 538);
        assert_eq!(split.n_test(), 230);
    }

    #[test]
    fn test_partition_is_disjoint_and_exhaustive() {
        let data = table(50);
        let split = train_test_split(&data, 0.30, 7).expect("split");
        let mut seen: Vec<usize> = split
            .x_train
            .column(0)
            .iter()
            .chain(split.x_test.column(0).iter())
            .map(|&v| v as usize)
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_labels_follow_their_rows() {
        let data = table(40);
        let split = train_test_split(&data, 0.25, 3).expect("split");
        for (row, &label) in split.x_test.outer_iter().zip(split.y_test.iter()) {
            let original = row[0] as usize;
            assert_eq!(label, (original % 2) as f64);
        }
    }

    #[test]
    fn test_invalid_fraction_rejected() {
        assert!(matches!(
            split_indices(100, 0.0, 0),
            Err(DataError::InvalidSplitFraction(_))
        ));
        assert!(matches!(
            split_indices(100, 1.0, 0),
            Err(DataError::InvalidSplitFraction(_))
        ));
    }

    #[test]
    fn test_too_few_rows_rejected() {
        assert!(matches!(
            split_indices(1, 0.30, 0),
            Err(DataError::TooFewRows(1))
        ));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_sides_cover_all_rows(n in 10usize..300, seed in 0u64..1000) {
                let (train, test) = split_indices(n, 0.30, seed).expect("split");
                prop_assert_eq!(train.len() + test.len(), n);
                prop_assert_eq!(test.len(), (n as f64 * 0.30).round() as usize);

                let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
                all.sort_unstable();
                prop_assert_eq!(all, (0..n).collect::<Vec<_>>());
            }

            #[test]
            fn prop_same_seed_same_partition(n in 10usize..200, seed in 0u64..1000) {
                let a = split_indices(n, 0.30, seed).expect("split");
                let b = split_indices(n, 0.30, seed).expect("split");
                prop_assert_eq!(a, b);
            }
        }
    }
}
