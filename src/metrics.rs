//! Evaluation of a binary classifier built by thresholding predicted
//! probabilities.
//!
//! An observation is classified as positive when its probability is strictly
//! greater than the threshold, so an observation sitting exactly on the
//! threshold counts as negative.

pub mod confusion;
pub mod roc;

pub use self::confusion::{confusion, ConfusionCounts, ConfusionMetrics};
pub use self::roc::{roc_curve, roc_curve_with, threshold_sweep, RocCurve, RocPoint, ThresholdGrid};

use crate::{
    error::{RegressionError, RegressionResult},
    response::Response,
};
use ndarray::{ArrayBase, Data, Ix1};
use num_traits::Float;

/// Check that probabilities and labels describe the same observations and
/// convert the labels to booleans.
pub(crate) fn paired_inputs<F, Y, PS, LS>(
    probs: &ArrayBase<PS, Ix1>,
    labels: &ArrayBase<LS, Ix1>,
) -> RegressionResult<Vec<(F, bool)>>
where
    F: Float,
    Y: Response + Copy,
    PS: Data<Elem = F>,
    LS: Data<Elem = Y>,
{
    if probs.len() != labels.len() {
        return Err(RegressionError::BadInput(format!(
            "{} probabilities given for {} labels",
            probs.len(),
            labels.len()
        )));
    }
    if probs.is_empty() {
        return Err(RegressionError::BadInput(
            "no observations to evaluate".to_string(),
        ));
    }
    probs
        .iter()
        .zip(labels.iter())
        .enumerate()
        .map(|(i, (&p, &y))| {
            if !p.is_finite() {
                return Err(RegressionError::BadInput(format!(
                    "predicted probability at index {} is not finite",
                    i
                )));
            }
            Ok((p, y.is_positive()?))
        })
        .collect()
}

/// A threshold must be comparable with every probability.
pub(crate) fn check_threshold<F: Float>(threshold: F) -> RegressionResult<()> {
    if threshold.is_nan() {
        return Err(RegressionError::BadInput("threshold is NaN".to_string()));
    }
    Ok(())
}
