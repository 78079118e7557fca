//! Response variable domains accepted for a binary outcome

use crate::error::{RegressionError, RegressionResult};
use num_traits::Float;

/// Describes how a value of the binary response variable maps to the floating
/// point 0/1 used by the IRLS. Implementing this trait for a type allows it to
/// be used for the response of a model and for the labels passed to the
/// classifier metrics.
pub trait Response: Sized {
    /// Converts the observation to 0 or 1. Any other value is an error.
    fn into_float<F: Float>(self) -> RegressionResult<F>;

    /// Whether the observation belongs to the positive class.
    fn is_positive(self) -> RegressionResult<bool> {
        Ok(self.into_float::<f64>()? == 1.0)
    }
}

impl Response for bool {
    fn into_float<F: Float>(self) -> RegressionResult<F> {
        Ok(if self { F::one() } else { F::zero() })
    }

    fn is_positive(self) -> RegressionResult<bool> {
        Ok(self)
    }
}

impl Response for u8 {
    fn into_float<F: Float>(self) -> RegressionResult<F> {
        match self {
            0 => Ok(F::zero()),
            1 => Ok(F::one()),
            _ => Err(RegressionError::InvalidY(self.to_string())),
        }
    }
}

// We can't use a blanket implementation over num_traits::Float because of the
// possibility of conflicting implementations upstream, so manually implement
// for f32 and f64.
impl Response for f32 {
    fn into_float<F: Float>(self) -> RegressionResult<F> {
        if self == 0.0 {
            Ok(F::zero())
        } else if self == 1.0 {
            Ok(F::one())
        } else {
            Err(RegressionError::InvalidY(self.to_string()))
        }
    }
}

impl Response for f64 {
    fn into_float<F: Float>(self) -> RegressionResult<F> {
        if self == 0.0 {
            Ok(F::zero())
        } else if self == 1.0 {
            Ok(F::one())
        } else {
            Err(RegressionError::InvalidY(self.to_string()))
        }
    }
}
