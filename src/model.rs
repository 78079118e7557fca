//! Collect data for and configure a logistic regression model

use crate::{
    error::{RegressionError, RegressionResult},
    fit::{options::FitConfig, Fit},
    link::logit,
    logistic,
    num::Float,
    response::Response,
    utility::{default_names, one_pad},
};
use log::debug;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix1, Ix2};
use ndarray_linalg::{EigValsh, UPLO};

/// Holds the data for a logistic regression. The response is stored as 0/1
/// floating point values and the design matrix already includes the constant
/// column when an intercept is used.
#[derive(Debug, Clone)]
pub struct Model<F>
where
    F: Float,
{
    /// the observation of response data by event
    pub y: Array1<F>,
    /// the design matrix with events in rows and instances in columns
    pub x: Array2<F>,
    /// Whether the intercept term is used (commonly true)
    pub use_intercept: bool,
    /// The name of each regressor, in the column order of `x`
    pub names: Vec<String>,
}

impl<F> Model<F>
where
    F: Float,
{
    /// Perform the regression with the default options and return a fit
    /// object holding the results.
    pub fn fit(&self) -> RegressionResult<Fit<'_, F>> {
        self.fit_options().fit()
    }

    /// Fit options builder to adjust the iteration limits, tolerance and
    /// initial guess before fitting.
    pub fn fit_options(&self) -> FitConfig<'_, F> {
        FitConfig::new(self)
    }

    /// The number of observations.
    pub fn n_obs(&self) -> usize {
        self.y.len()
    }

    /// The number of regression parameters, including the intercept if used.
    pub fn n_params(&self) -> usize {
        self.x.ncols()
    }

    /// Returns the linear predictors, i.e. the design matrix multiplied by the
    /// regression parameters. Each entry in the resulting array is the log-odds
    /// for a given observation.
    pub fn linear_predictor(&self, regressors: &Array1<F>) -> Array1<F> {
        self.x.dot(regressors)
    }

    /// The log-likelihood of the data given a set of regression parameters.
    pub fn log_likelihood(&self, regressors: &Array1<F>) -> F {
        logistic::log_likelihood(&self.y, &self.linear_predictor(regressors))
    }

    /// The response as class labels.
    pub fn labels(&self) -> Array1<bool> {
        self.y.mapv(|y| y == F::one())
    }

    /// The starting point for IRLS. The intercept, when present, is set to the
    /// log-odds of the sample mean so the first iteration starts from the
    /// intercept-only model; every other parameter starts at zero.
    pub(crate) fn initial_guess(&self) -> Array1<F> {
        let mut guess = Array1::<F>::zeros(self.n_params());
        if self.use_intercept && !self.y.is_empty() {
            let y_bar = self.y.sum() / F::from(self.n_obs()).unwrap();
            if y_bar > F::zero() && y_bar < F::one() {
                guess[0] = logit(y_bar);
            }
        }
        guess
    }
}

/// Provides an interface to create the full model option struct with convenient
/// type inference.
pub struct ModelBuilder;

impl ModelBuilder {
    /// Borrow the Y and X data where each row in the arrays is a new
    /// observation, and create the full model builder with the data to allow
    /// for adjusting additional options.
    pub fn data<'a, Y, F, YD, XD>(
        data_y: &'a ArrayBase<YD, Ix1>,
        data_x: &'a ArrayBase<XD, Ix2>,
    ) -> ModelBuilderData<'a, Y, F>
    where
        Y: Response + Copy,
        F: Float,
        YD: Data<Elem = Y>,
        XD: Data<Elem = F>,
    {
        ModelBuilderData {
            data_y: data_y.view(),
            data_x: data_x.view(),
            use_intercept_term: true,
            col_tol: None,
            names: None,
        }
    }
}

/// Holds the data and all the specifications for the model and provides
/// functions to adjust the settings.
pub struct ModelBuilderData<'a, Y, F>
where
    Y: Response,
    F: 'static + Float,
{
    /// Observed response variable data where each entry is a new observation.
    data_y: ArrayView1<'a, Y>,
    /// Design matrix of observed covariate data where each row is a new
    /// observation and each column represents a different dependent variable.
    data_x: ArrayView2<'a, F>,
    /// Whether to use an intercept term. Defaults to `true`.
    use_intercept_term: bool,
    /// Relative tolerance on the eigenvalues of X^T * X for the rank check.
    col_tol: Option<F>,
    /// Names of the covariate columns.
    names: Option<Vec<String>>,
}

/// A builder to generate a Model object
impl<'a, Y, F> ModelBuilderData<'a, Y, F>
where
    Y: Response + Copy,
    F: Float,
{
    /// Do not add a constant term to the design matrix
    pub fn no_constant(mut self) -> Self {
        self.use_intercept_term = false;
        self
    }

    /// Set the tolerance for the co-linearity check. The design matrix is
    /// rejected when, after scaling every column to unit norm, the smallest
    /// eigenvalue of X^T * X is not larger than this fraction of the largest.
    pub fn colinearity_tolerance(mut self, tol: F) -> Self {
        self.col_tol = Some(tol);
        self
    }

    /// Name the covariate columns of X, in order. The intercept, if used, is
    /// always named `(Intercept)`.
    pub fn feature_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> RegressionResult<Model<F>> {
        let n_data = self.data_y.len();
        if n_data != self.data_x.nrows() {
            return Err(RegressionError::BadInput(
                "y and x data must have same number of points".to_string(),
            ));
        }
        if let Some(((row, col), _)) = self
            .data_x
            .indexed_iter()
            .find(|&(_, &x)| !num_traits::Float::is_finite(x))
        {
            return Err(RegressionError::BadInput(format!(
                "non-finite value in x at row {}, column {}",
                row, col
            )));
        }

        // convert to floating-point
        let data_y: Array1<F> = self
            .data_y
            .iter()
            .map(|&y| y.into_float())
            .collect::<Result<_, _>>()?;

        let n_covariates = self.data_x.ncols();
        let names = match self.names {
            Some(names) => {
                if names.len() != n_covariates {
                    return Err(RegressionError::BadInput(format!(
                        "{} feature names given for {} columns",
                        names.len(),
                        n_covariates
                    )));
                }
                let intercept = self.use_intercept_term.then(|| "(Intercept)".to_string());
                intercept.into_iter().chain(names).collect()
            }
            None => default_names(n_covariates, self.use_intercept_term),
        };

        // add constant term to X data
        let data_x = if self.use_intercept_term {
            one_pad(self.data_x)
        } else {
            self.data_x.to_owned()
        };
        let n_par = data_x.ncols();
        if n_par == 0 {
            return Err(RegressionError::BadInput(
                "no regressors: x has no columns and the intercept is disabled".to_string(),
            ));
        }
        // Check if the data is under-constrained
        if n_data < n_par {
            return Err(RegressionError::Underconstrained);
        }

        let col_tol = self.col_tol.unwrap_or_else(|| default_epsilon(n_par));
        check_full_rank(&data_x, col_tol)?;
        debug!(
            "built logistic model with {} observations and {} parameters",
            n_data, n_par
        );

        Ok(Model {
            y: data_y,
            x: data_x,
            use_intercept: self.use_intercept_term,
            names,
        })
    }
}

/// Ensure the design matrix has full column rank. Each column is scaled to
/// unit norm first so that the test depends on the directions of the columns
/// and not on their units; the eigenvalues of the scaled X^T * X are then
/// compared relative to the largest.
fn check_full_rank<F: Float>(data_x: &Array2<F>, tol: F) -> RegressionResult<()> {
    let norms: Array1<F> =
        data_x.map_axis(Axis(0), |col| num_traits::Float::sqrt(col.dot(&col)));
    if let Some(col) = norms.iter().position(|&norm| !(norm > F::zero())) {
        debug!("rank check failed: column {} of X is zero", col);
        return Err(RegressionError::RankDeficiency);
    }
    let scaled: Array2<F> = data_x / &norms;
    let gram: Array2<F> = scaled.t().dot(&scaled);
    let eigenvalues: Array1<F> = gram.eigvalsh(UPLO::Lower)?;
    let (min_eig, max_eig) = extreme_values(&eigenvalues);
    if !(max_eig > F::zero()) || min_eig <= tol * max_eig {
        debug!(
            "rank check failed: eigenvalues of the scaled X^T X span [{:e}, {:e}]",
            min_eig, max_eig
        );
        return Err(RegressionError::RankDeficiency);
    }
    Ok(())
}

/// The smallest and largest entries of an array of eigenvalues.
pub(crate) fn extreme_values<F: Float>(values: &Array1<F>) -> (F, F) {
    values.iter().fold(
        (F::infinity(), F::neg_infinity()),
        |(lo, hi), &v| (num_traits::Float::min(lo, v), num_traits::Float::max(hi, v)),
    )
}

/// Default tolerance for colinearity checking.
/// Scales machine epsilon by the number of parameters, with a safety factor
/// for the rounding accumulated when forming the scaled X^T * X.
fn default_epsilon<F: Float>(n_par: usize) -> F {
    F::from(64 * n_par).unwrap() * F::epsilon()
}
