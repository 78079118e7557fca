//! struct holding the fit result of a logistic regression

pub mod options;

use self::options::FitOptions;
use crate::{
    error::{RegressionError, RegressionResult},
    inference::{chi_sq_sf, pvalue_z, z_critical},
    irls::Irls,
    link::{expit, odds},
    logistic,
    metrics::{self, ConfusionMetrics, RocCurve, ThresholdGrid},
    model::{extreme_values, Model},
    num::{to_f64, Float},
    utility::one_pad,
};
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};
use ndarray_linalg::{Eigh, UPLO};
use serde::{Deserialize, Serialize};

/// The result of a logistic regression fit. All of the values are fixed when
/// the fit is created; `converged()` must be checked before the estimates are
/// trusted.
#[derive(Debug)]
pub struct Fit<'a, F>
where
    F: Float,
{
    /// The data and model specification used in the fit.
    data: &'a Model<F>,
    /// The options used for this fit.
    options: FitOptions<F>,
    /// The parameter values that maximize the likelihood as given by the IRLS regression.
    result: Array1<F>,
    /// Whether the relative change in likelihood reached the tolerance.
    converged: bool,
    /// The number of IRLS iterations taken.
    n_iter: usize,
    /// The log-likelihood at the final parameters.
    model_like: F,
    /// The fitted probability of each training observation.
    fitted: Array1<F>,
    /// The inverse of the Fisher information at the final parameters.
    covariance: Array2<F>,
    /// The square roots of the diagonal of the covariance matrix.
    standard_errors: Array1<F>,
}

/// A row of the coefficient table of a fit, in the form handed to a
/// reporting layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub name: String,
    /// The estimated change in log-odds per unit of the regressor.
    pub estimate: f64,
    pub std_err: f64,
    /// Wald statistic, estimate / std_err.
    pub z: f64,
    pub p_value: f64,
    pub conf_low: f64,
    pub conf_high: f64,
    /// exp(estimate)
    pub odds_ratio: f64,
}

impl<'a, F> Fit<'a, F>
where
    F: Float,
{
    /// Run IRLS on the model data and collect the results.
    pub(crate) fn regression(data: &'a Model<F>, options: FitOptions<F>) -> RegressionResult<Self> {
        options.validate()?;
        let initial: Array1<F> = match &options.init_guess {
            Some(guess) => {
                if guess.len() != data.n_params() {
                    return Err(RegressionError::BadInput(format!(
                        "initial guess has {} parameters but the model has {}",
                        guess.len(),
                        data.n_params()
                    )));
                }
                if guess.iter().any(|b| !num_traits::Float::is_finite(*b)) {
                    return Err(RegressionError::BadInput(
                        "initial guess is not finite".to_string(),
                    ));
                }
                guess.clone()
            }
            None => data.initial_guess(),
        };
        let initial_like: F = data.log_likelihood(&initial);

        let (result, model_like, converged, n_iter) = {
            let mut irls = Irls::new(data, initial.clone(), &options, initial_like);
            let mut result = initial;
            let mut model_like = initial_like;
            for step in irls.by_ref() {
                let step = step?;
                result = step.guess;
                model_like = step.like;
            }
            (result, model_like, irls.converged, irls.n_iter)
        };
        if converged {
            debug!("IRLS converged after {} iterations", n_iter);
        } else {
            warn!(
                "IRLS did not converge after {} iterations (limit {}); the estimates are unreliable",
                n_iter, options.max_iter
            );
        }

        let fitted: Array1<F> = data.linear_predictor(&result).mapv(expit);
        let n_boundary = fitted
            .iter()
            .filter(|&&p| p <= F::epsilon() || p >= F::one() - F::epsilon())
            .count();
        if n_boundary > 0 {
            warn!(
                "{} fitted probabilities are numerically 0 or 1; the data may be separable",
                n_boundary
            );
        }

        // The Fisher information uses the exact weights, not the clamped
        // working weights of the iteration.
        let weights: Array1<F> = fitted.mapv(logistic::variance);
        let information: Array2<F> = (&data.x.t() * &weights).dot(&data.x);
        let covariance = invert_information(information)?;
        let standard_errors = covariance.diag().mapv(num_traits::Float::sqrt);

        Ok(Self {
            data,
            options,
            result,
            converged,
            n_iter,
            model_like,
            fitted,
            covariance,
            standard_errors,
        })
    }

    /// The parameter estimates, intercept first if it is used.
    pub fn result(&self) -> &Array1<F> {
        &self.result
    }

    /// Whether IRLS met the tolerance before the iteration limit.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// The number of IRLS iterations taken.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// The options the fit was run with.
    pub fn options(&self) -> &FitOptions<F> {
        &self.options
    }

    /// Standard errors of the estimates from the inverse Fisher information.
    pub fn standard_errors(&self) -> &Array1<F> {
        &self.standard_errors
    }

    /// The asymptotic covariance matrix of the estimates, (X^T W X)^-1.
    pub fn covariance(&self) -> &Array2<F> {
        &self.covariance
    }

    /// The fitted probabilities of the training observations.
    pub fn fitted(&self) -> &Array1<F> {
        &self.fitted
    }

    pub fn n_obs(&self) -> usize {
        self.data.n_obs()
    }

    /// The number of data points minus the number of free parameters.
    pub fn ndf(&self) -> usize {
        self.data.n_obs() - self.result.len()
    }

    /// The log-likelihood of the fitted model.
    pub fn model_like(&self) -> F {
        self.model_like
    }

    /// The log-likelihood of the null model: intercept-only when an intercept
    /// is used, every probability 1/2 otherwise.
    pub fn null_like(&self) -> F {
        if self.data.use_intercept {
            logistic::null_log_likelihood(&self.data.y)
        } else {
            self.data
                .log_likelihood(&Array1::zeros(self.data.n_params()))
        }
    }

    /// The residual deviance, -2 times the log-likelihood. The saturated
    /// likelihood vanishes for a 0/1 response.
    pub fn deviance(&self) -> F {
        -F::from(2.).unwrap() * self.model_like
    }

    pub fn null_deviance(&self) -> F {
        -F::from(2.).unwrap() * self.null_like()
    }

    /// Akaike information criterion
    pub fn aic(&self) -> F {
        self.deviance() + F::from(2 * self.result.len()).unwrap()
    }

    /// Bayesian information criterion
    pub fn bic(&self) -> F {
        let n_obs = F::from(self.n_obs()).unwrap();
        self.deviance() + F::from(self.result.len()).unwrap() * num_traits::Float::ln(n_obs)
    }

    /// The likelihood-ratio statistic of the fit against the null model. It
    /// is asymptotically chi-squared under the null hypothesis.
    pub fn lr_test(&self) -> F {
        self.null_deviance() - self.deviance()
    }

    /// The p-value of the likelihood-ratio test against the null model.
    pub fn lr_test_p_value(&self) -> RegressionResult<f64> {
        let dof = if self.data.use_intercept {
            self.result.len() - 1
        } else {
            self.result.len()
        };
        chi_sq_sf(to_f64(self.lr_test()), dof)
    }

    /// The Wald z-score of each parameter.
    pub fn z_scores(&self) -> Array1<F> {
        &self.result / &self.standard_errors
    }

    /// Two-sided p-values of the Wald test that each parameter is zero.
    pub fn p_values(&self) -> RegressionResult<Array1<f64>> {
        self.z_scores()
            .iter()
            .map(|&z| pvalue_z(to_f64(z)))
            .collect()
    }

    /// Wald confidence intervals at the given level, one row of (low, high)
    /// for each parameter.
    pub fn conf_int(&self, level: f64) -> RegressionResult<Array2<F>> {
        let z_crit: F = F::from(z_critical(level)?)
            .ok_or_else(|| RegressionError::BadInput("critical value overflow".to_string()))?;
        let mut bounds = Array2::<F>::zeros((self.result.len(), 2));
        for ((mut row, &beta), &se) in bounds
            .rows_mut()
            .into_iter()
            .zip(self.result.iter())
            .zip(self.standard_errors.iter())
        {
            row[0] = beta - z_crit * se;
            row[1] = beta + z_crit * se;
        }
        Ok(bounds)
    }

    /// The odds ratio exp(beta) of each parameter.
    pub fn odds_ratios(&self) -> Array1<F> {
        self.result.mapv(odds)
    }

    /// Confidence intervals of the odds ratios, the exponentiated Wald
    /// intervals of the parameters.
    pub fn odds_ratio_conf_int(&self, level: f64) -> RegressionResult<Array2<F>> {
        Ok(self.conf_int(level)?.mapv_into(odds))
    }

    /// The coefficient table with Wald inference at the given confidence
    /// level.
    pub fn coefficients(&self, level: f64) -> RegressionResult<Vec<Coefficient>> {
        let z_scores = self.z_scores();
        let p_values = self.p_values()?;
        let bounds = self.conf_int(level)?;
        Ok(self
            .data
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| Coefficient {
                name: name.clone(),
                estimate: to_f64(self.result[i]),
                std_err: to_f64(self.standard_errors[i]),
                z: to_f64(z_scores[i]),
                p_value: p_values[i],
                conf_low: to_f64(bounds[[i, 0]]),
                conf_high: to_f64(bounds[[i, 1]]),
                odds_ratio: to_f64(odds(self.result[i])),
            })
            .collect())
    }

    /// The log-odds predicted for new observations, where each row of `data_x`
    /// holds the covariates in the same column order as the training data.
    pub fn predict_linear<S>(&self, data_x: &ArrayBase<S, Ix2>) -> RegressionResult<Array1<F>>
    where
        S: Data<Elem = F>,
    {
        let n_cov = if self.data.use_intercept {
            self.result.len() - 1
        } else {
            self.result.len()
        };
        if data_x.ncols() != n_cov {
            return Err(RegressionError::BadInput(format!(
                "expected {} covariate columns, found {}",
                n_cov,
                data_x.ncols()
            )));
        }
        let linear_predictor = if self.data.use_intercept {
            one_pad(data_x.view()).dot(&self.result)
        } else {
            data_x.dot(&self.result)
        };
        Ok(linear_predictor)
    }

    /// The probability of the positive outcome for new observations.
    pub fn predict<S>(&self, data_x: &ArrayBase<S, Ix2>) -> RegressionResult<Array1<F>>
    where
        S: Data<Elem = F>,
    {
        Ok(self.predict_linear(data_x)?.mapv_into(expit))
    }

    /// The confusion matrix of the training data classified at `threshold`.
    pub fn confusion(&self, threshold: F) -> RegressionResult<ConfusionMetrics<F>> {
        metrics::confusion(&self.fitted, &self.data.labels(), threshold)
    }

    /// Confusion metrics of the training data over a sweep of thresholds.
    pub fn threshold_sweep(
        &self,
        grid: &ThresholdGrid<F>,
    ) -> RegressionResult<Vec<ConfusionMetrics<F>>> {
        metrics::threshold_sweep(&self.fitted, &self.data.labels(), grid)
    }

    /// The ROC curve of the training data.
    pub fn roc(&self) -> RegressionResult<RocCurve<F>> {
        metrics::roc_curve(&self.fitted, &self.data.labels())
    }
}

/// Invert the Fisher information through its eigendecomposition, failing if
/// it is not safely positive definite. The matrix is scaled to unit diagonal
/// before the test so that the units of the regressors do not matter.
fn invert_information<F: Float>(information: Array2<F>) -> RegressionResult<Array2<F>> {
    let n_par = information.nrows();
    let scale: Array1<F> = information.diag().mapv(num_traits::Float::sqrt);
    if scale.iter().any(|&d| !(d > F::min_positive_value())) {
        debug!("information has a vanishing diagonal entry");
        return Err(RegressionError::SingularInformation);
    }
    let outer: Array2<F> =
        &scale.view().insert_axis(Axis(1)) * &scale.view().insert_axis(Axis(0));
    let correlation: Array2<F> = &information / &outer;
    let (eigenvalues, eigenvectors): (Array1<F>, Array2<F>) = correlation.eigh(UPLO::Lower)?;
    let (min_eig, max_eig) = extreme_values(&eigenvalues);
    let tol = F::from(n_par).unwrap() * F::epsilon();
    if !(max_eig > F::min_positive_value()) || min_eig <= tol * max_eig {
        debug!(
            "scaled information eigenvalues span [{:e}, {:e}]",
            min_eig, max_eig
        );
        return Err(RegressionError::SingularInformation);
    }
    let inv_eigenvalues: Array1<F> = eigenvalues.mapv(|l| F::one() / l);
    let inv_correlation: Array2<F> = (&eigenvectors * &inv_eigenvalues).dot(&eigenvectors.t());
    Ok(inv_correlation / &outer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelBuilder;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::array;

    /// A simple test where the correct value for the data is known exactly.
    #[test]
    fn log_reg() -> RegressionResult<()> {
        let beta = array![0., 1.0];
        let ln2 = f64::ln(2.);
        let data_x = array![[0.], [0.], [ln2], [ln2], [ln2]];
        let data_y = array![true, false, true, true, false];
        let model = ModelBuilder::data(&data_y, &data_x).build()?;
        let fit = model.fit()?;
        assert!(fit.converged());
        assert_abs_diff_eq!(beta, *fit.result(), epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn invert_diagonal() -> RegressionResult<()> {
        let information = array![[4., 0.], [0., 0.25]];
        let covariance = invert_information(information)?;
        assert_abs_diff_eq!(covariance, array![[0.25, 0.], [0., 4.]], epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn singular_information() {
        let information = array![[1., 2.], [2., 4.]];
        assert!(matches!(
            invert_information(information),
            Err(RegressionError::SingularInformation)
        ));
        let information: Array2<f64> = Array2::zeros((2, 2));
        assert!(matches!(
            invert_information(information),
            Err(RegressionError::SingularInformation)
        ));
    }

    /// Widely different regressor scales give a badly conditioned but
    /// invertible information matrix.
    #[test]
    fn invert_mixed_scales() -> RegressionResult<()> {
        let information = array![[1e20, 1e7], [1e7, 1e-4]];
        let covariance = invert_information(information)?;
        let det = 1e16 - 1e14;
        let expected = array![[1e-4, -1e7], [-1e7, 1e20]] / det;
        assert_relative_eq!(covariance, expected, max_relative = 1e-10);
        Ok(())
    }
}
