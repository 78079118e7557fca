//! Binary logistic regression fit by iteratively reweighted least squares, and
//! evaluation of the resulting classifier.
//!
//! ```no_run
//! use ndarray::array;
//! use ndarray_logit::{ModelBuilder, RegressionResult};
//!
//! fn main() -> RegressionResult<()> {
//!     let data_y = array![true, false, true, true, false, false];
//!     let data_x = array![[0.5], [-1.2], [2.0], [0.1], [0.3], [-0.7]];
//!     let model = ModelBuilder::data(&data_y, &data_x).build()?;
//!     let fit = model.fit_options().max_iter(50).fit()?;
//!     println!("{:?}", fit.coefficients(0.95)?);
//!     println!("AUC = {}", fit.roc()?.auc);
//!     Ok(())
//! }
//! ```

#[cfg_attr(test, macro_use(array))]
extern crate ndarray;

pub mod error;
pub mod fit;
pub mod inference;
mod irls;
pub mod link;
pub mod logistic;
mod math;
pub mod metrics;
pub mod model;
pub mod num;
pub mod response;
pub mod utility;

pub use error::{RegressionError, RegressionResult};
pub use fit::{
    options::{FitConfig, FitOptions},
    Coefficient, Fit,
};
pub use metrics::{
    confusion, roc_curve, roc_curve_with, threshold_sweep, ConfusionCounts, ConfusionMetrics,
    RocCurve, RocPoint, ThresholdGrid,
};
pub use model::{Model, ModelBuilder};
pub use response::Response;
