//! Confusion matrix and ROC evaluation of thresholded probabilities

use anyhow::Result;
use approx::assert_abs_diff_eq;
use ndarray::{array, Array1};
use ndarray_logit::{
    confusion, roc_curve, roc_curve_with, threshold_sweep, ConfusionCounts, ConfusionMetrics,
    ModelBuilder, RegressionError, ThresholdGrid,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

mod common;
use common::{concordance, random_scores, simulate};

#[test]
fn perfect_ranking() -> Result<()> {
    let labels = array![0u8, 0, 1, 1];
    let probs = array![0.2, 0.4, 0.6, 0.8];
    let metrics = confusion(&probs, &labels, 0.5)?;
    assert_eq!(
        metrics.counts,
        ConfusionCounts {
            true_pos: 2,
            false_pos: 0,
            true_neg: 2,
            false_neg: 0
        }
    );
    assert_eq!(metrics.sensitivity, Some(1.));
    assert_eq!(metrics.specificity, Some(1.));
    assert_eq!(metrics.ppv, Some(1.));
    assert_eq!(metrics.npv, Some(1.));
    assert_eq!(metrics.accuracy, Some(1.));
    assert_eq!(roc_curve(&probs, &labels)?.auc, 1.);
    Ok(())
}

#[test]
fn inverted_ranking() -> Result<()> {
    let labels = array![false, false, true, true];
    let probs = array![0.8, 0.6, 0.4, 0.2];
    let metrics = confusion(&probs, &labels, 0.5)?;
    assert_eq!(
        metrics.counts,
        ConfusionCounts {
            true_pos: 0,
            false_pos: 2,
            true_neg: 0,
            false_neg: 2
        }
    );
    assert_eq!(metrics.sensitivity, Some(0.));
    assert_eq!(metrics.specificity, Some(0.));
    assert_eq!(metrics.accuracy, Some(0.));
    assert_eq!(roc_curve(&probs, &labels)?.auc, 0.);
    Ok(())
}

#[test]
fn extreme_thresholds() -> Result<()> {
    let labels = array![false, true, false, true, true];
    let probs = array![0.1, 0.3, 0.5, 0.7, 0.9];
    // everything is positive at a threshold of zero
    let all_pos = confusion(&probs, &labels, 0.)?;
    assert_eq!(all_pos.counts.true_pos, 3);
    assert_eq!(all_pos.counts.false_pos, 2);
    assert_eq!(all_pos.sensitivity, Some(1.));
    assert_eq!(all_pos.specificity, Some(0.));
    assert_eq!(all_pos.npv, None);
    // and negative at a threshold of one
    let all_neg = confusion(&probs, &labels, 1.)?;
    assert_eq!(all_neg.counts.true_neg, 2);
    assert_eq!(all_neg.counts.false_neg, 3);
    assert_eq!(all_neg.sensitivity, Some(0.));
    assert_eq!(all_neg.specificity, Some(1.));
    assert_eq!(all_neg.ppv, None);
    assert_eq!(all_neg.accuracy, Some(0.4));
    Ok(())
}

#[test]
fn single_class_labels() -> Result<()> {
    let probs = array![0.1, 0.6, 0.8];
    let labels = array![true, true, true];
    // the confusion matrix is still defined, with undefined specificity
    let metrics = confusion(&probs, &labels, 0.5)?;
    assert_eq!(metrics.sensitivity, Some(2. / 3.));
    assert_eq!(metrics.specificity, None);
    assert!(matches!(
        roc_curve(&probs, &labels),
        Err(RegressionError::DegenerateLabels)
    ));
    let labels = array![false, false, false];
    assert!(matches!(
        roc_curve_with(&probs, &labels, &ThresholdGrid::fine_uniform()),
        Err(RegressionError::DegenerateLabels)
    ));
    Ok(())
}

#[test]
fn invalid_inputs() {
    let probs = array![0.1, 0.6, 0.8];
    assert!(matches!(
        confusion(&probs, &array![true, false], 0.5),
        Err(RegressionError::BadInput(_))
    ));
    assert!(matches!(
        confusion(&probs, &array![true, false, true], f64::NAN),
        Err(RegressionError::BadInput(_))
    ));
    assert!(matches!(
        roc_curve(&array![0.1, f64::NAN], &array![true, false]),
        Err(RegressionError::BadInput(_))
    ));
    assert!(matches!(
        roc_curve(&Array1::<f64>::zeros(0), &Array1::<bool>::from(vec![])),
        Err(RegressionError::BadInput(_))
    ));
}

/// The curve runs from (0, 0) to (1, 1) and never moves backwards.
#[test]
fn curve_is_monotone() -> Result<()> {
    let (probs, labels) = random_scores(300, 1);
    let roc = roc_curve(&probs, &labels)?;
    let first = roc.points.first().expect("curve is not empty");
    let last = roc.points.last().expect("curve is not empty");
    assert_eq!((first.fpr, first.tpr), (0., 0.));
    assert_eq!((last.fpr, last.tpr), (1., 1.));
    assert_eq!(last.threshold, f64::NEG_INFINITY);
    for (a, b) in roc.points.iter().zip(roc.points.iter().skip(1)) {
        assert!(a.threshold > b.threshold);
        assert!(a.fpr <= b.fpr && a.tpr <= b.tpr);
    }
    Ok(())
}

/// A predictor that carries no information about the labels has an expected
/// AUC of one half.
#[test]
fn random_predictor_auc() -> Result<()> {
    let n_trials = 200;
    let mut total = 0.;
    for seed in 0..n_trials {
        let (probs, labels) = random_scores(200, 1000 + seed);
        total += roc_curve(&probs, &labels)?.auc;
    }
    assert_abs_diff_eq!(total / n_trials as f64, 0.5, epsilon = 0.02);
    Ok(())
}

/// The trapezoidal area equals the probability that a positive outranks a
/// negative, with ties counted as one half.
#[test]
fn auc_is_concordance() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(31);
    // coarse probabilities give many ties
    let probs = Array1::from_shape_simple_fn(400, || (rng.gen::<f64>() * 20.).round() / 20.);
    let labels = probs.mapv(|p| rng.gen::<f64>() < p);
    let roc = roc_curve(&probs, &labels)?;
    assert_abs_diff_eq!(roc.auc, concordance(&probs, &labels), epsilon = 1e-12);
    assert!(roc.auc > 0.5);
    Ok(())
}

/// Flipping both the scores and the labels swaps the roles of sensitivity and
/// specificity.
#[test]
fn sensitivity_specificity_symmetry() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(37);
    // dyadic values so that 1 - p is exact
    let probs = Array1::from_shape_simple_fn(100, || rng.gen_range(0..=16) as f64 / 16.);
    let labels = Array1::from_shape_simple_fn(100, || rng.gen_bool(0.4));
    let flip_probs = probs.mapv(|p| 1. - p);
    let flip_labels = labels.mapv(|y: bool| !y);
    for k in 0..16 {
        // thresholds between the possible probabilities
        let t = (2 * k + 1) as f64 / 32.;
        let metrics = confusion(&probs, &labels, t)?;
        let flipped = confusion(&flip_probs, &flip_labels, 1. - t)?;
        assert_eq!(metrics.sensitivity, flipped.specificity);
        assert_eq!(metrics.specificity, flipped.sensitivity);
        assert_eq!(metrics.ppv, flipped.npv);
    }
    Ok(())
}

/// Each entry of a sweep is the confusion matrix at its threshold.
#[test]
fn sweep_matches_confusion() -> Result<()> {
    let (probs, labels) = random_scores(50, 41);
    let sweep = threshold_sweep(&probs, &labels, &ThresholdGrid::Distinct)?;
    assert_eq!(sweep.len(), 51);
    for metrics in &sweep {
        assert_eq!(metrics, &confusion(&probs, &labels, metrics.threshold)?);
    }
    let grid = ThresholdGrid::Uniform {
        lo: 0.05,
        hi: 0.95,
        n_points: 19,
    };
    let sweep = threshold_sweep(&probs, &labels, &grid)?;
    assert_eq!(sweep.len(), 21);
    for metrics in &sweep {
        assert_eq!(metrics, &confusion(&probs, &labels, metrics.threshold)?);
    }
    Ok(())
}

/// A fine uniform grid approximates the exact curve.
#[test]
fn uniform_grid_approximates_exact() -> Result<()> {
    let (data_y, data_x) = simulate(500, 0., &[1.2], 43);
    let model = ModelBuilder::data(&data_y, &data_x).build()?;
    let fit = model.fit()?;
    let exact = fit.roc()?;
    let approx = roc_curve_with(fit.fitted(), &data_y, &ThresholdGrid::fine_uniform())?;
    assert_eq!(approx.points.len(), 1002);
    assert_abs_diff_eq!(exact.auc, approx.auc, epsilon = 0.01);
    assert_eq!(exact, roc_curve(fit.fitted(), &data_y)?);
    Ok(())
}

#[test]
fn youden_point() -> Result<()> {
    let labels = array![false, false, true, true];
    let probs = array![0.2, 0.4, 0.6, 0.8];
    let roc = roc_curve(&probs, &labels)?;
    let best = roc.youden().expect("curve is not empty");
    assert_eq!(best.threshold, 0.4);
    assert_eq!((best.fpr, best.tpr), (0., 1.));
    Ok(())
}

#[test]
fn fit_evaluation() -> Result<()> {
    let (data_y, data_x) = simulate(800, -0.4, &[1.0, -0.5], 47);
    let model = ModelBuilder::data(&data_y, &data_x).build()?;
    let fit = model.fit()?;
    let metrics = fit.confusion(0.5)?;
    assert_eq!(metrics.counts.total(), 800);
    assert_eq!(metrics, confusion(fit.fitted(), &data_y, 0.5)?);
    let sweep = fit.threshold_sweep(&ThresholdGrid::default())?;
    assert_eq!(
        sweep.last().map(|m| m.counts.true_pos),
        Some(metrics.counts.positives())
    );
    // the training fit ranks better than chance
    assert!(fit.roc()?.auc > 0.6);
    Ok(())
}

/// Metrics records go to a reporting layer as plain data.
#[test]
fn serialize_metrics() -> Result<()> {
    let metrics = confusion(&array![0.1, 0.9, 0.7], &array![false, true, true], 0.8)?;
    let json = serde_json::to_string(&metrics)?;
    assert!(json.contains("\"sensitivity\":0.5"));
    assert!(json.contains("\"npv\":0.5"));
    let parsed: ConfusionMetrics<f64> = serde_json::from_str(&json)?;
    assert_eq!(metrics, parsed);

    let all_pos = confusion(&array![0.1, 0.9], &array![true, true], 0.)?;
    let json = serde_json::to_value(&all_pos)?;
    assert!(json["specificity"].is_null());
    Ok(())
}
