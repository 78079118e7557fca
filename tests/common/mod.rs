//! Utility functions for testing
#![allow(dead_code)]
use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Route the library's log output through the test harness. Set `RUST_LOG`
/// to see it.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Draw a design of independent standard normal covariates and a response
/// from the logistic model with intercept `alpha` and slopes `beta`.
pub fn simulate(n: usize, alpha: f64, beta: &[f64], seed: u64) -> (Array1<bool>, Array2<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let data_x: Array2<f64> =
        Array2::from_shape_simple_fn((n, beta.len()), || rng.sample(StandardNormal));
    let data_y = data_x
        .rows()
        .into_iter()
        .map(|row| {
            let eta = alpha + row.iter().zip(beta).map(|(x, b)| x * b).sum::<f64>();
            let p = 1. / (1. + (-eta).exp());
            rng.gen::<f64>() < p
        })
        .collect();
    (data_y, data_x)
}

/// Random probabilities in (0, 1) and labels drawn independently of them.
pub fn random_scores(n: usize, seed: u64) -> (Array1<f64>, Array1<bool>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let probs = Array1::from_shape_simple_fn(n, || rng.gen::<f64>());
    let labels = Array1::from_shape_simple_fn(n, || rng.gen_bool(0.5));
    (probs, labels)
}

/// The probability that a random positive outranks a random negative, with
/// ties counted as one half, by direct enumeration of all pairs.
pub fn concordance(probs: &Array1<f64>, labels: &Array1<bool>) -> f64 {
    let pos: Vec<f64> = probs
        .iter()
        .zip(labels)
        .filter(|(_, y)| **y)
        .map(|(&p, _)| p)
        .collect();
    let neg: Vec<f64> = probs
        .iter()
        .zip(labels)
        .filter(|(_, y)| !**y)
        .map(|(&p, _)| p)
        .collect();
    let mut score = 0.;
    for &p in &pos {
        for &q in &neg {
            if p > q {
                score += 1.;
            } else if p == q {
                score += 0.5;
            }
        }
    }
    score / (pos.len() * neg.len()) as f64
}
