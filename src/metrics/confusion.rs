//! The 2x2 confusion matrix and the rates derived from it

use super::{check_threshold, paired_inputs};
use crate::{error::RegressionResult, response::Response};
use ndarray::{ArrayBase, Data, Ix1};
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Counts of the four outcomes of a binary classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_pos: usize,
    pub false_pos: usize,
    pub true_neg: usize,
    pub false_neg: usize,
}

/// `num / den`, undefined when the denominator is zero.
fn ratio(num: usize, den: usize) -> Option<f64> {
    if den == 0 {
        None
    } else {
        Some(num as f64 / den as f64)
    }
}

impl ConfusionCounts {
    /// Tally (predicted, actual) pairs.
    pub fn tally<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (bool, bool)>,
    {
        outcomes
            .into_iter()
            .fold(Self::default(), |mut counts, outcome| {
                match outcome {
                    (true, true) => counts.true_pos += 1,
                    (true, false) => counts.false_pos += 1,
                    (false, false) => counts.true_neg += 1,
                    (false, true) => counts.false_neg += 1,
                }
                counts
            })
    }

    pub fn total(&self) -> usize {
        self.true_pos + self.false_pos + self.true_neg + self.false_neg
    }

    /// Number of actual positives.
    pub fn positives(&self) -> usize {
        self.true_pos + self.false_neg
    }

    /// Number of actual negatives.
    pub fn negatives(&self) -> usize {
        self.true_neg + self.false_pos
    }

    /// TP / (TP + FN), the true positive rate.
    pub fn sensitivity(&self) -> Option<f64> {
        ratio(self.true_pos, self.positives())
    }

    /// TN / (TN + FP), the true negative rate.
    pub fn specificity(&self) -> Option<f64> {
        ratio(self.true_neg, self.negatives())
    }

    /// FP / (FP + TN). This is 1 - specificity, computed without the
    /// subtraction.
    pub fn false_positive_rate(&self) -> Option<f64> {
        ratio(self.false_pos, self.negatives())
    }

    /// TP / (TP + FP), the positive predictive value or precision.
    pub fn ppv(&self) -> Option<f64> {
        ratio(self.true_pos, self.true_pos + self.false_pos)
    }

    /// TN / (TN + FN), the negative predictive value.
    pub fn npv(&self) -> Option<f64> {
        ratio(self.true_neg, self.true_neg + self.false_neg)
    }

    /// (TP + TN) / n
    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.true_pos + self.true_neg, self.total())
    }
}

/// The confusion counts at one threshold together with the derived rates. A
/// rate is `None` when its denominator is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMetrics<F> {
    pub threshold: F,
    pub counts: ConfusionCounts,
    pub sensitivity: Option<f64>,
    pub specificity: Option<f64>,
    pub ppv: Option<f64>,
    pub npv: Option<f64>,
    pub accuracy: Option<f64>,
}

impl<F> ConfusionMetrics<F> {
    pub fn from_counts(threshold: F, counts: ConfusionCounts) -> Self {
        Self {
            threshold,
            counts,
            sensitivity: counts.sensitivity(),
            specificity: counts.specificity(),
            ppv: counts.ppv(),
            npv: counts.npv(),
            accuracy: counts.accuracy(),
        }
    }

    /// Youden's J statistic, sensitivity + specificity - 1.
    pub fn youden(&self) -> Option<f64> {
        Some(self.sensitivity? + self.specificity? - 1.)
    }
}

/// Classify each observation as positive when its probability is strictly
/// greater than `threshold` and compare against the labels.
pub fn confusion<F, Y, PS, LS>(
    probs: &ArrayBase<PS, Ix1>,
    labels: &ArrayBase<LS, Ix1>,
    threshold: F,
) -> RegressionResult<ConfusionMetrics<F>>
where
    F: Float,
    Y: Response + Copy,
    PS: Data<Elem = F>,
    LS: Data<Elem = Y>,
{
    check_threshold(threshold)?;
    let pairs = paired_inputs(probs, labels)?;
    let counts = ConfusionCounts::tally(pairs.into_iter().map(|(p, y)| (p > threshold, y)));
    Ok(ConfusionMetrics::from_counts(threshold, counts))
}
