//! Threshold sweeps and the receiver operating characteristic curve

use super::{check_threshold, paired_inputs, ConfusionCounts, ConfusionMetrics};
use crate::{
    error::{RegressionError, RegressionResult},
    response::Response,
};
use itertools::Itertools;
use log::trace;
use ndarray::{ArrayBase, Data, Ix1};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The set of thresholds to sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThresholdGrid<F> {
    /// Every distinct predicted probability, which gives the exact empirical
    /// ROC curve.
    Distinct,
    /// `n_points` evenly spaced thresholds from `hi` down to `lo`. The curve
    /// is an approximation whose resolution depends on the grid.
    Uniform { lo: F, hi: F, n_points: usize },
}

impl<F> Default for ThresholdGrid<F> {
    fn default() -> Self {
        ThresholdGrid::Distinct
    }
}

impl<F: Float> ThresholdGrid<F> {
    /// 1000 evenly spaced thresholds in [0.001, 0.999].
    pub fn fine_uniform() -> Self {
        ThresholdGrid::Uniform {
            lo: F::from(0.001).unwrap(),
            hi: F::from(0.999).unwrap(),
            n_points: 1000,
        }
    }
}

/// One point of the ROC curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint<F> {
    pub threshold: F,
    /// false positive rate, 1 - specificity
    pub fpr: f64,
    /// true positive rate, the sensitivity
    pub tpr: f64,
}

impl<F> RocPoint<F> {
    /// The point for the counts at a threshold, undefined unless both classes
    /// are present.
    pub fn from_counts(threshold: F, counts: &ConfusionCounts) -> Option<Self> {
        Some(Self {
            threshold,
            fpr: counts.false_positive_rate()?,
            tpr: counts.sensitivity()?,
        })
    }
}

/// An ROC curve ordered from the highest threshold to the lowest, so that it
/// runs from (0, 0) to (1, 1), and the area under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve<F> {
    pub points: Vec<RocPoint<F>>,
    pub auc: f64,
}

impl<F: Copy> RocCurve<F> {
    /// The point that maximizes Youden's J = TPR - FPR. Ties go to the
    /// highest threshold.
    pub fn youden(&self) -> Option<RocPoint<F>> {
        self.points.iter().copied().fold(None, |best, point| match best {
            Some(b) if b.tpr - b.fpr >= point.tpr - point.fpr => Some(b),
            _ => Some(point),
        })
    }
}

/// Observations sorted by decreasing probability, with the running count of
/// positives, so that the confusion counts at any threshold are found with a
/// binary search.
struct Ranking<F> {
    probs_desc: Vec<F>,
    /// `cum_pos[i]` is the number of positives among the first `i` observations.
    cum_pos: Vec<usize>,
    n_pos: usize,
    n_neg: usize,
}

impl<F: Float> Ranking<F> {
    fn new(mut pairs: Vec<(F, bool)>) -> Self {
        // NaN has been excluded by the input check.
        pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        let cum_pos: Vec<usize> = std::iter::once(0)
            .chain(pairs.iter().scan(0, |acc, &(_, y)| {
                *acc += y as usize;
                Some(*acc)
            }))
            .collect();
        let n_pos = cum_pos[pairs.len()];
        let n_neg = pairs.len() - n_pos;
        Self {
            probs_desc: pairs.into_iter().map(|(p, _)| p).collect(),
            cum_pos,
            n_pos,
            n_neg,
        }
    }

    /// The counts when every probability strictly above `threshold` is
    /// classified positive.
    fn counts_at(&self, threshold: F) -> ConfusionCounts {
        let n_above = self.probs_desc.partition_point(|&p| p > threshold);
        let true_pos = self.cum_pos[n_above];
        let false_pos = n_above - true_pos;
        ConfusionCounts {
            true_pos,
            false_pos,
            true_neg: self.n_neg - false_pos,
            false_neg: self.n_pos - true_pos,
        }
    }

    /// The thresholds of a grid in decreasing order. The sequence always ends
    /// at -inf, where everything is positive, and starts at or above the
    /// largest probability, where nothing is.
    fn thresholds(&self, grid: &ThresholdGrid<F>) -> RegressionResult<Vec<F>> {
        let mut thresholds: Vec<F> = match *grid {
            ThresholdGrid::Distinct => self.probs_desc.iter().copied().dedup().collect(),
            ThresholdGrid::Uniform { lo, hi, n_points } => {
                check_threshold(lo)?;
                check_threshold(hi)?;
                if lo > hi {
                    return Err(RegressionError::BadInput(
                        "threshold grid has lo > hi".to_string(),
                    ));
                }
                let step = if n_points > 1 {
                    (hi - lo) / F::from(n_points - 1).unwrap()
                } else {
                    F::zero()
                };
                std::iter::once(F::infinity())
                    .chain((0..n_points).map(|i| hi - step * F::from(i).unwrap()))
                    .collect()
            }
        };
        thresholds.push(F::neg_infinity());
        Ok(thresholds)
    }
}

/// The confusion metrics at each threshold of the grid, ordered from the
/// highest threshold to the lowest.
pub fn threshold_sweep<F, Y, PS, LS>(
    probs: &ArrayBase<PS, Ix1>,
    labels: &ArrayBase<LS, Ix1>,
    grid: &ThresholdGrid<F>,
) -> RegressionResult<Vec<ConfusionMetrics<F>>>
where
    F: Float,
    Y: Response + Copy,
    PS: Data<Elem = F>,
    LS: Data<Elem = Y>,
{
    let ranking = Ranking::new(paired_inputs(probs, labels)?);
    let thresholds = ranking.thresholds(grid)?;
    trace!(
        "sweeping {} thresholds over {} observations",
        thresholds.len(),
        ranking.probs_desc.len()
    );
    Ok(thresholds
        .into_iter()
        .map(|t| ConfusionMetrics::from_counts(t, ranking.counts_at(t)))
        .collect())
}

/// The exact empirical ROC curve, sweeping every distinct predicted
/// probability.
pub fn roc_curve<F, Y, PS, LS>(
    probs: &ArrayBase<PS, Ix1>,
    labels: &ArrayBase<LS, Ix1>,
) -> RegressionResult<RocCurve<F>>
where
    F: Float,
    Y: Response + Copy,
    PS: Data<Elem = F>,
    LS: Data<Elem = Y>,
{
    roc_curve_with(probs, labels, &ThresholdGrid::Distinct)
}

/// The ROC curve over the thresholds of the given grid. Fails when the labels
/// hold a single class, since one of the rates is then undefined everywhere.
pub fn roc_curve_with<F, Y, PS, LS>(
    probs: &ArrayBase<PS, Ix1>,
    labels: &ArrayBase<LS, Ix1>,
    grid: &ThresholdGrid<F>,
) -> RegressionResult<RocCurve<F>>
where
    F: Float,
    Y: Response + Copy,
    PS: Data<Elem = F>,
    LS: Data<Elem = Y>,
{
    let ranking = Ranking::new(paired_inputs(probs, labels)?);
    if ranking.n_pos == 0 || ranking.n_neg == 0 {
        return Err(RegressionError::DegenerateLabels);
    }
    let thresholds = ranking.thresholds(grid)?;
    let counts: Vec<ConfusionCounts> = thresholds.iter().map(|&t| ranking.counts_at(t)).collect();
    let auc = trapezoid_auc(&counts, ranking.n_pos, ranking.n_neg);
    let points = thresholds
        .into_iter()
        .zip(counts)
        .map(|(threshold, c)| RocPoint::from_counts(threshold, &c))
        .collect::<Option<Vec<_>>>()
        .ok_or(RegressionError::DegenerateLabels)?;
    Ok(RocCurve { points, auc })
}

/// The trapezoidal area under consecutive (FP, TP) count pairs, accumulated in
/// integers and normalized once so that a perfect ranking gives exactly 1.
fn trapezoid_auc(counts: &[ConfusionCounts], n_pos: usize, n_neg: usize) -> f64 {
    let twice_area: u128 = counts
        .iter()
        .tuple_windows()
        .map(|(a, b)| {
            let width = (b.false_pos - a.false_pos) as u128;
            width * (a.true_pos + b.true_pos) as u128
        })
        .sum();
    twice_area as f64 / (2 * n_pos as u128 * n_neg as u128) as f64
}
