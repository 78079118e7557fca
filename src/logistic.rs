//! Likelihood and variance functions of the Bernoulli response with a logit link

use crate::math::prod_log;
use ndarray::{Array1, Zip};
use num_traits::Float;

/// var = mu*(1-mu)
pub fn variance<F: Float>(mean: F) -> F {
    mean * (F::one() - mean)
}

/// The log-likelihood of a single observation as a function of the natural
/// parameter, which for the canonical link is the logit of p.
pub fn log_like_natural<F: Float>(y: F, logit_p: F) -> F {
    // Both of these expressions are mathematically identical.
    // The distinction is made to avoid under/overflow.
    let (yt, xt) = if logit_p < F::zero() {
        (y, logit_p)
    } else {
        (F::one() - y, -logit_p)
    };
    yt * xt - xt.exp().ln_1p()
}

/// The total log-likelihood of the responses given their linear predictors.
pub fn log_likelihood<F: Float>(data_y: &Array1<F>, linear_predictor: &Array1<F>) -> F {
    Zip::from(data_y)
        .and(linear_predictor)
        .fold(F::zero(), |acc, &y, &lin_pred| {
            acc + log_like_natural(y, lin_pred)
        })
}

/// The log-likelihood of the best intercept-only model, which predicts the
/// sample mean for every observation.
pub fn null_log_likelihood<F: Float>(data_y: &Array1<F>) -> F {
    if data_y.is_empty() {
        return F::zero();
    }
    let n_obs = F::from(data_y.len()).unwrap();
    let y_bar = data_y.sum() / n_obs;
    n_obs * (prod_log(y_bar) + prod_log(F::one() - y_bar))
}
