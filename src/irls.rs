//! Iteratively re-weighed least squares algorithm
use crate::{
    error::{RegressionError, RegressionResult},
    fit::options::FitOptions,
    link::expit,
    logistic,
    model::Model,
    num::Float,
};
use log::{debug, warn};
use ndarray::{Array1, Array2};
use ndarray_linalg::SolveH;

/// Iterate over updates via iteratively re-weighted least-squares until
/// reaching a specified tolerance or the maximum number of iterations.
pub struct Irls<'a, F>
where
    F: Float,
{
    data: &'a Model<F>,
    /// The current parameter guess.
    guess: Array1<F>,
    /// The options for the fit
    options: &'a FitOptions<F>,
    /// The number of iterations taken so far
    pub n_iter: usize,
    /// The likelihood for the previous iteration
    last_like: F,
    /// Sometimes the next guess is better than the previous but within
    /// tolerance, so we want to return the current guess but exit immediately
    /// in the next iteration.
    done: bool,
    /// Set once the relative change in the likelihood falls within tolerance.
    /// Remains false if iteration stops for any other reason.
    pub converged: bool,
}

impl<'a, F> Irls<'a, F>
where
    F: Float,
{
    pub fn new(
        data: &'a Model<F>,
        initial: Array1<F>,
        options: &'a FitOptions<F>,
        initial_like: F,
    ) -> Self {
        Self {
            data,
            guess: initial,
            options,
            n_iter: 0,
            last_like: initial_like,
            done: false,
            converged: false,
        }
    }

    /// A helper function to step to a new guess while incrementing the number
    /// of iterations.
    fn step_with(&mut self, next_guess: Array1<F>, next_like: F, step_halves: usize) -> IrlsStep<F> {
        self.guess.assign(&next_guess);
        self.last_like = next_like;
        self.n_iter += 1;
        debug!(
            "IRLS iteration {}: log-likelihood {:e}, {} step halvings",
            self.n_iter, next_like, step_halves
        );
        IrlsStep {
            guess: next_guess,
            like: next_like,
            step_halves,
        }
    }

    /// Returns the (LHS, RHS) of the IRLS update matrix equation
    /// (X^T W X) beta' = X^T W z, along with the number of working weights
    /// that had to be clamped.
    ///
    /// The working response is z = eta + (y - p)/w, so the right-hand side is
    /// evaluated as X^T (W eta + (y - p)) which never divides by a weight.
    fn irls_mat_vec(&self) -> (Array2<F>, Array1<F>, usize) {
        let linear_predictor: Array1<F> = self.data.linear_predictor(&self.guess);
        // The probability of each observation being true given the current guess.
        let predictor: Array1<F> = linear_predictor.mapv(expit);

        // The working weights p(1-p) underflow to zero as p approaches 0 or 1
        // under (quasi-)separation, so they are bounded below.
        let min_weight = self.options.min_weight;
        let mut n_clamped: usize = 0;
        let weights: Array1<F> = predictor.mapv(|p| {
            let w = logistic::variance(p);
            if w < min_weight {
                n_clamped += 1;
                min_weight
            } else {
                w
            }
        });

        // The errors represent the difference between observed and predicted.
        let errors = &self.data.y - &predictor;

        // X weighted by the model variance for each observation.
        // This is the negative Hessian of the likelihood.
        let neg_hessian: Array2<F> = (&self.data.x.t() * &weights).dot(&self.data.x);

        let rhs: Array1<F> = {
            let target: Array1<F> = (&weights * &linear_predictor) + errors;
            self.data.x.t().dot(&target)
        };
        (neg_hessian, rhs, n_clamped)
    }

    /// The relative change of the likelihood. This is positive for an
    /// improved guess.
    fn relative_change(&self, next_like: F) -> F {
        (next_like - self.last_like) / (F::epsilon() + num_traits::Float::abs(next_like))
    }
}

/// Represents a step in the IRLS. Holds the current guess, likelihood, and the
/// number of step halvings needed to reach it.
#[derive(Debug, Clone)]
pub struct IrlsStep<F> {
    /// The current parameter guess.
    pub guess: Array1<F>,
    /// The log-likelihood of the current guess.
    pub like: F,
    /// The number of step halvings applied this iteration. Usually zero.
    pub step_halves: usize,
}

impl<'a, F> Iterator for Irls<'a, F>
where
    F: Float,
{
    type Item = RegressionResult<IrlsStep<F>>;

    /// Acquire the next IRLS step based on the previous one.
    fn next(&mut self) -> Option<Self::Item> {
        // if the last step was an improvement but within tolerance, this step
        // has been flagged to terminate early.
        if self.done {
            return None;
        }
        if self.n_iter >= self.options.max_iter {
            self.done = true;
            return None;
        }

        let (irls_mat, irls_vec, n_clamped) = self.irls_mat_vec();
        if n_clamped > 0 {
            debug!(
                "{} of {} working weights clamped to {:e}",
                n_clamped,
                self.data.n_obs(),
                self.options.min_weight
            );
        }
        let mut next_guess: Array1<F> = match irls_mat.solveh_into(irls_vec) {
            Ok(solution) => solution,
            Err(err) => {
                self.done = true;
                return Some(Err(err.into()));
            }
        };
        if next_guess.iter().any(|b| !num_traits::Float::is_finite(*b)) {
            self.done = true;
            return Some(Err(RegressionError::SingularInformation));
        }

        let mut next_like = self.data.log_likelihood(&next_guess);
        let mut rel = self.relative_change(next_like);
        // Terminate if the difference is close to zero
        if num_traits::Float::abs(rel) <= self.options.tol {
            self.converged = true;
            self.done = true;
            // If this guess is an improvement then go ahead and return it. The
            // equivalence with zero is necessary in order to return a value
            // when the iteration starts at the best guess.
            if rel >= F::zero() {
                return Some(Ok(self.step_with(next_guess, next_like, 0)));
            }
            return None;
        }
        // If this guess is a strict improvement, return it immediately.
        if rel > F::zero() {
            return Some(Ok(self.step_with(next_guess, next_like, 0)));
        }

        // apply step halving if rel < 0, which means the likelihood has decreased.
        // Don't terminate if rel gets back to within tolerance as a result of this.
        let mut step_halves = 0;
        let half: F = F::from(0.5).unwrap();
        let mut step_multiplier = half;
        while rel < -self.options.tol && step_halves < self.options.max_step_halves {
            // The next guess for the step-halving
            let next_guess_sh = next_guess.mapv(|x| x * step_multiplier)
                + &self.guess.mapv(|x| x * (F::one() - step_multiplier));
            let next_like_sh = self.data.log_likelihood(&next_guess_sh);
            let next_rel = self.relative_change(next_like_sh);
            if next_rel >= rel {
                next_guess = next_guess_sh;
                next_like = next_like_sh;
                rel = next_rel;
                step_multiplier = half;
            } else {
                step_multiplier = step_multiplier * half;
            }
            step_halves += 1;
        }

        if rel > F::zero() {
            Some(Ok(self.step_with(next_guess, next_like, step_halves)))
        } else {
            // We can end up here if the step direction is a poor one. The
            // current guess is kept, and it only counts as converged if the
            // likelihood is flat to within tolerance.
            self.done = true;
            self.converged = num_traits::Float::abs(rel) <= self.options.tol;
            if !self.converged {
                warn!(
                    "IRLS step halving failed to improve the likelihood after {} halvings",
                    step_halves
                );
            }
            None
        }
    }
}
