//! Reference distributions for Wald and likelihood-ratio tests.
//!
//! The statistics of a logistic regression fit are asymptotic, so z-scores are
//! compared against the standard normal and likelihood-ratio statistics
//! against a chi-squared distribution.

use crate::error::{RegressionError, RegressionResult};
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

fn std_normal() -> RegressionResult<Normal> {
    Normal::new(0., 1.).map_err(|err| RegressionError::BadInput(err.to_string()))
}

/// Two-tailed p-value of a standard normal statistic, P(|Z| > |z|).
pub fn pvalue_z(z: f64) -> RegressionResult<f64> {
    if z.is_nan() {
        return Err(RegressionError::BadInput("z statistic is NaN".to_string()));
    }
    Ok(2. * std_normal()?.sf(z.abs()))
}

/// The critical value z such that a central interval of +/- z holds the given
/// probability mass of the standard normal, e.g. 1.96 for a level of 0.95.
pub fn z_critical(level: f64) -> RegressionResult<f64> {
    if !(level > 0. && level < 1.) {
        return Err(RegressionError::BadInput(format!(
            "confidence level {} is not in (0, 1)",
            level
        )));
    }
    Ok(std_normal()?.inverse_cdf(0.5 + 0.5 * level))
}

/// Upper-tail probability of a chi-squared statistic with `dof` degrees of
/// freedom. With no degrees of freedom the statistic is identically zero and
/// the p-value is one.
pub fn chi_sq_sf(stat: f64, dof: usize) -> RegressionResult<f64> {
    if stat.is_nan() {
        return Err(RegressionError::BadInput(
            "chi-squared statistic is NaN".to_string(),
        ));
    }
    if dof == 0 {
        return Ok(1.);
    }
    let chi_sq =
        ChiSquared::new(dof as f64).map_err(|err| RegressionError::BadInput(err.to_string()))?;
    Ok(chi_sq.sf(stat.max(0.)))
}
