//! Binary classification metrics
//!
//! Accuracy, ROC AUC, and the ROC curve itself. AUC uses the Mann-Whitney
//! rank formulation with midrank tie handling, which equals the trapezoidal
//! area under the ROC curve.

use std::cmp::Ordering;

use ndarray::Array1;

/// Errors from metric computation
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("Length mismatch: {truth} labels vs {other} values")]
    LengthMismatch { truth: usize, other: usize },

    #[error("Empty input")]
    Empty,

    #[error("ROC AUC is undefined: only one class present")]
    SingleClass,
}

/// Result alias for metric computation
pub type Result<T> = std::result::Result<T, EvalError>;

/// Fraction of predictions that exactly match the labels
pub fn accuracy(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let matches = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(a, b)| a == b)
        .count();
    Ok(matches as f64 / y_true.len() as f64)
}

/// Area under the ROC curve from class-1 scores
///
/// Computed as the normalized Mann-Whitney U statistic: the probability
/// that a random positive outranks a random negative, counting ties as
/// half. Errors with [`EvalError::SingleClass`] when all labels agree.
pub fn roc_auc_score(y_true: &Array1<f64>, scores: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, scores)?;
    let n = y_true.len();
    let n_pos = y_true.iter().filter(|&&y| y == 1.0).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(EvalError::SingleClass);
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(Ordering::Equal)
    });

    // Midranks: tied scores share the average of their 1-based ranks.
    let mut rank_sum_pos = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let midrank = (i + j + 2) as f64 / 2.0;
        for &idx in &order[i..=j] {
            if y_true[idx] == 1.0 {
                rank_sum_pos += midrank;
            }
        }
        i = j + 1;
    }

    let n_pos_f = n_pos as f64;
    let n_neg_f = n_neg as f64;
    Ok((rank_sum_pos - n_pos_f * (n_pos_f + 1.0) / 2.0) / (n_pos_f * n_neg_f))
}

/// Points of the ROC curve, anchored at (0, 0)
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    /// False positive rate at each threshold
    pub fpr: Vec<f64>,
    /// True positive rate at each threshold
    pub tpr: Vec<f64>,
    /// Decision thresholds, descending; the first is infinity
    pub thresholds: Vec<f64>,
}

/// Compute the ROC curve by sweeping distinct score thresholds descending
pub fn roc_curve(y_true: &Array1<f64>, scores: &Array1<f64>) -> Result<RocCurve> {
    check_lengths(y_true, scores)?;
    let n = y_true.len();
    let n_pos = y_true.iter().filter(|&&y| y == 1.0).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(EvalError::SingleClass);
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });

    let mut fpr = vec![0.0];
    let mut tpr = vec![0.0];
    let mut thresholds = vec![f64::INFINITY];

    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;
    while i < n {
        let threshold = scores[order[i]];
        let mut j = i;
        while j < n && scores[order[j]] == threshold {
            if y_true[order[j]] == 1.0 {
                tp += 1;
            } else {
                fp += 1;
            }
            j += 1;
        }
        fpr.push(fp as f64 / n_neg as f64);
        tpr.push(tp as f64 / n_pos as f64);
        thresholds.push(threshold);
        i = j;
    }

    Ok(RocCurve {
        fpr,
        tpr,
        thresholds,
    })
}

fn check_lengths(y_true: &Array1<f64>, other: &Array1<f64>) -> Result<()> {
    if y_true.len() != other.len() {
        return Err(EvalError::LengthMismatch {
            truth: y_true.len(),
            other: other.len(),
        });
    }
    if y_true.is_empty() {
        return Err(EvalError::Empty);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_accuracy_matches_sklearn() {
        // Reference value computed with sklearn 1.4.0 accuracy_score
        let y_true = array![0.0, 1.0, 1.0, 0.0, 1.0];
        let y_pred = array![0.0, 1.0, 0.0, 0.0, 1.0];
        let acc = accuracy(&y_true, &y_pred).expect("accuracy");
        assert_relative_eq!(acc, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_accuracy_bounds() {
        let y = array![0.0, 1.0];
        assert_eq!(accuracy(&y, &y).expect("accuracy"), 1.0);
        let flipped = array![1.0, 0.0];
        assert_eq!(accuracy(&y, &flipped).expect("accuracy"), 0.0);
    }

    #[test]
    fn test_auc_matches_sklearn() {
        // Reference value computed with sklearn 1.4.0 roc_auc_score
        let y_true = array![0.0, 0.0, 1.0, 1.0];
        let scores = array![0.1, 0.4, 0.35, 0.8];
        let auc = roc_auc_score(&y_true, &scores).expect("auc");
        assert_relative_eq!(auc, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_auc_with_ties_matches_sklearn() {
        // Reference value computed with sklearn 1.4.0 roc_auc_score
        let y_true = array![0.0, 1.0, 0.0, 1.0];
        let scores = array![0.5, 0.5, 0.3, 0.9];
        let auc = roc_auc_score(&y_true, &scores).expect("auc");
        assert_relative_eq!(auc, 0.875, epsilon = 1e-12);
    }

    #[test]
    fn test_auc_perfect_and_inverted() {
        let y_true = array![0.0, 0.0, 1.0, 1.0];
        let perfect = array![0.1, 0.2, 0.8, 0.9];
        assert!((roc_auc_score(&y_true, &perfect).expect("auc") - 1.0).abs() < 1e-12);
        let inverted = array![0.9, 0.8, 0.2, 0.1];
        assert!(roc_auc_score(&y_true, &inverted).expect("auc").abs() < 1e-12);
    }

    #[test]
    fn test_auc_single_class_undefined() {
        let y_true = array![1.0, 1.0, 1.0];
        let scores = array![0.2, 0.5, 0.9];
        assert!(matches!(
            roc_auc_score(&y_true, &scores),
            Err(EvalError::SingleClass)
        ));
    }

    #[test]
    fn test_random_scores_give_auc_near_half() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let n = 2000;
        let mut rng = StdRng::seed_from_u64(17);
        let y_true = Array1::from_shape_fn(n, |i| (i % 2) as f64);
        let scores = Array1::from_shape_fn(n, |_| rng.random::<f64>());
        let auc = roc_auc_score(&y_true, &scores).expect("auc");
        assert!(
            (auc - 0.5).abs() < 0.05,
            "uninformative scores should give AUC near 0.5, got {auc}"
        );
    }

    #[test]
    fn test_roc_curve_matches_sklearn() {
        // Reference values computed with sklearn 1.4.0 roc_curve
        let y_true = array![0.0, 0.0, 1.0, 1.0];
        let scores = array![0.1, 0.4, 0.35, 0.8];
        let curve = roc_curve(&y_true, &scores).expect("curve");
        assert_eq!(curve.fpr, vec![0.0, 0.0, 0.5, 0.5, 1.0]);
        assert_eq!(curve.tpr, vec![0.0, 0.5, 0.5, 1.0, 1.0]);
        assert!(curve.thresholds[0].is_infinite());
        assert_eq!(&curve.thresholds[1..], &[0.8, 0.4, 0.35, 0.1]);
    }

    #[test]
    fn test_roc_curve_area_equals_rank_auc() {
        let y_true = array![0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let scores = array![0.2, 0.7, 0.6, 0.4, 0.9, 0.35, 0.35, 0.1];
        let auc = roc_auc_score(&y_true, &scores).expect("auc");
        let curve = roc_curve(&y_true, &scores).expect("curve");
        let mut area = 0.0;
        for w in 1..curve.fpr.len() {
            area += (curve.fpr[w] - curve.fpr[w - 1]) * (curve.tpr[w] + curve.tpr[w - 1]) / 2.0;
        }
        assert!(
            (auc - area).abs() < 1e-12,
            "rank AUC {auc} should equal trapezoidal area {area}"
        );
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let y_true = array![0.0, 1.0];
        let scores = array![0.5];
        assert!(matches!(
            roc_auc_score(&y_true, &scores),
            Err(EvalError::LengthMismatch { truth: 2, other: 1 })
        ));
        assert!(matches!(
            accuracy(&y_true, &scores),
            Err(EvalError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        let empty = Array1::<f64>::zeros(0);
        assert!(matches!(accuracy(&empty, &empty), Err(EvalError::Empty)));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn labels_and_scores() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
            proptest::collection::vec((proptest::bool::ANY, 0.0f64..1.0), 4..60).prop_map(|rows| {
                rows.into_iter()
                    .map(|(label, score)| (f64::from(label), score))
                    .unzip()
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_auc_in_unit_interval((labels, scores) in labels_and_scores()) {
                let y = Array1::from_vec(labels);
                let s = Array1::from_vec(scores);
                if let Ok(auc) = roc_auc_score(&y, &s) {
                    prop_assert!((0.0..=1.0).contains(&auc));
                }
            }

            #[test]
            fn prop_auc_complement((labels, scores) in labels_and_scores()) {
                let y = Array1::from_vec(labels);
                let s = Array1::from_vec(scores.clone());
                let negated = Array1::from_vec(scores.iter().map(|v| -v).collect::<Vec<f64>>());
                if let (Ok(auc), Ok(auc_neg)) = (roc_auc_score(&y, &s), roc_auc_score(&y, &negated)) {
                    prop_assert!((auc + auc_neg - 1.0).abs() < 1e-9);
                }
            }

            #[test]
            fn prop_accuracy_in_unit_interval((labels, scores) in labels_and_scores()) {
                let y = Array1::from_vec(labels);
                let pred = Array1::from_vec(
                    scores.iter().map(|&v| f64::from(v >= 0.5)).collect::<Vec<f64>>(),
                );
                let acc = accuracy(&y, &pred).expect("accuracy");
                prop_assert!((0.0..=1.0).contains(&acc));
            }
        }
    }
}
