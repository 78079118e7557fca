//! The logit link function and its inverse.
//!
//! The logit is the canonical link for a binomial response, so the linear
//! predictor is the log-odds of the positive outcome and a coefficient is the
//! change in log-odds per unit change of its regressor.

use num_traits::Float;

/// The logit function g(p) = log(p/(1-p)), mapping a probability to the
/// log-odds.
pub fn logit<F: Float>(p: F) -> F {
    (p / (F::one() - p)).ln()
}

/// The inverse of the logit, 1/(1+exp(-x)), mapping a linear predictor to a
/// probability. Evaluated so that neither branch can overflow.
pub fn expit<F: Float>(lin_pred: F) -> F {
    if lin_pred >= F::zero() {
        (F::one() + (-lin_pred).exp()).recip()
    } else {
        let e = lin_pred.exp();
        e / (F::one() + e)
    }
}

/// The odds p/(1-p) corresponding to a log-odds value.
pub fn odds<F: Float>(log_odds: F) -> F {
    log_odds.exp()
}
