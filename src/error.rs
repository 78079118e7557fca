//! define the error enum for the result of regressions and classifier evaluation

use ndarray_linalg::error::LinalgError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegressionError {
    #[error("Inconsistent input: {0}")]
    BadInput(String),
    #[error("Invalid response data: {0} is not 0 or 1")]
    InvalidY(String),
    #[error("Linear algebra")]
    LinalgError {
        #[from]
        source: LinalgError,
    },
    #[error("Underconstrained data")]
    Underconstrained,
    /// The columns of the design matrix are linearly dependent, so the
    /// coefficients are not identifiable.
    #[error("Design matrix does not have full column rank")]
    RankDeficiency,
    /// The Fisher information at the final estimate cannot be inverted. This
    /// is typical of (quasi-)separated data.
    #[error("Information matrix is singular; standard errors are undefined")]
    SingularInformation,
    /// The labels contain a single class, so one of sensitivity and
    /// specificity is undefined at every threshold.
    #[error("Labels contain only one class")]
    DegenerateLabels,
}

pub type RegressionResult<T> = Result<T, RegressionError>;
