//! numerical trait constraints
use ndarray::ScalarOperand;
use ndarray_linalg::Lapack;

/// The floating point types a regression can be carried out in. The real
/// type of the LAPACK scalar is required to be the type itself so that the
/// results of decompositions stay in `F`.
pub trait Float: Sized + num_traits::Float + Lapack<Real = Self> + ScalarOperand {}

impl Float for f32 {}
impl Float for f64 {}

/// Widen a value for the statistical reference distributions, which are
/// evaluated in double precision.
pub(crate) fn to_f64<F: num_traits::Float>(x: F) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}
