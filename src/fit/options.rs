//! Fit-specific configuration and fit builder
use super::Fit;
use crate::{
    error::{RegressionError, RegressionResult},
    model::Model,
    num::Float,
};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// A builder struct for fit configuration
pub struct FitConfig<'a, F>
where
    F: Float,
{
    pub(crate) model: &'a Model<F>,
    pub options: FitOptions<F>,
}

impl<'a, F> FitConfig<'a, F>
where
    F: Float,
{
    pub(crate) fn new(model: &'a Model<F>) -> Self {
        Self {
            model,
            options: FitOptions::default(),
        }
    }

    pub fn fit(self) -> RegressionResult<Fit<'a, F>> {
        Fit::regression(self.model, self.options)
    }

    /// Replace every option at once, e.g. with options read from a
    /// configuration file.
    pub fn with_options(mut self, options: FitOptions<F>) -> Self {
        self.options = options;
        self
    }

    /// Use a maximum number of iterations
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.options.max_iter = max_iter;
        self
    }

    /// Set the tolerance of iteration
    pub fn tol(mut self, tol: F) -> Self {
        self.options.tol = tol;
        self
    }

    /// Limit the number of step halvings tried when an update decreases the
    /// likelihood.
    pub fn max_step_halves(mut self, max_step_halves: usize) -> Self {
        self.options.max_step_halves = max_step_halves;
        self
    }

    /// Set the lower bound on the working weights.
    pub fn min_weight(mut self, min_weight: F) -> Self {
        self.options.min_weight = min_weight;
        self
    }

    /// Start the iteration from the given parameters instead of the default
    /// guess.
    pub fn init_guess(mut self, init_guess: Array1<F>) -> Self {
        self.options.init_guess = Some(init_guess);
        self
    }
}

/// Specifies the fitting options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, bound = "")]
pub struct FitOptions<F>
where
    F: Float,
{
    /// The maximum number of IRLS iterations
    pub max_iter: usize,
    /// The relative tolerance of the likelihood
    pub tol: F,
    /// The maximum number of step halvings in a single iteration
    pub max_step_halves: usize,
    /// Working weights p(1-p) are bounded below by this value
    pub min_weight: F,
    /// An initial guess. A sensible default is selected if this is not provided.
    pub init_guess: Option<Array1<F>>,
}

impl<F> FitOptions<F>
where
    F: Float,
{
    /// Options may be loaded from outside the program, so the tolerances are
    /// checked before a fit. Both must be finite and positive; a zero weight
    /// floor would let the working weights vanish.
    pub(crate) fn validate(&self) -> RegressionResult<()> {
        let positive = |x: F| num_traits::Float::is_finite(x) && x > F::zero();
        if !positive(self.tol) {
            return Err(RegressionError::BadInput(format!(
                "tolerance {:e} is not finite and positive",
                self.tol
            )));
        }
        if !positive(self.min_weight) {
            return Err(RegressionError::BadInput(format!(
                "minimum weight {:e} is not finite and positive",
                self.min_weight
            )));
        }
        Ok(())
    }
}

impl<F> Default for FitOptions<F>
where
    F: Float,
{
    fn default() -> Self {
        Self {
            max_iter: 25,
            // Single precision cannot resolve a relative change of 1e-8, so
            // the tolerance is kept a few epsilons above rounding.
            tol: num_traits::Float::max(
                F::from(1e-8).unwrap(),
                F::from(4.).unwrap() * F::epsilon(),
            ),
            max_step_halves: 8,
            min_weight: F::from(1e-10).unwrap(),
            init_guess: None,
        }
    }
}
