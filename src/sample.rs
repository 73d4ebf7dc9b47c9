// src/sample.rs

use core::fmt::Debug;
use core::ops::{Add, Neg, Sub};

use crate::common::FftError;

/// Numeric representation of one component of a complex sample.
///
/// The pipeline only ever adds, subtracts, negates, halves, and multiplies a
/// sample by a twiddle coefficient, so the same network code runs over
/// floating point and fixed point.
pub trait Sample:
    Copy + Debug + PartialEq + Add<Output = Self> + Sub<Output = Self> + Neg<Output = Self>
{
    /// Storage type of twiddle factors for this representation.
    type Coeff: Copy + Debug + PartialEq;

    const ZERO: Self;

    fn from_f64(value: f64) -> Self;

    fn to_f64(self) -> f64;

    fn coeff_from_f64(value: f64) -> Self::Coeff;

    fn coeff_to_f64(coeff: Self::Coeff) -> f64;

    fn mul_coeff(self, coeff: Self::Coeff) -> Self;

    fn scale_half(self) -> Self;

    /// Called once when a plan is built.
    fn check_precision() -> Result<(), FftError> {
        Ok(())
    }
}

impl Sample for f32 {
    type Coeff = f32;

    const ZERO: Self = 0.0;

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn coeff_from_f64(value: f64) -> f32 {
        value as f32
    }

    #[inline]
    fn coeff_to_f64(coeff: f32) -> f64 {
        coeff as f64
    }

    #[inline]
    fn mul_coeff(self, coeff: f32) -> Self {
        self * coeff
    }

    #[inline]
    fn scale_half(self) -> Self {
        self * 0.5
    }
}

impl Sample for f64 {
    type Coeff = f64;

    const ZERO: Self = 0.0;

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn coeff_from_f64(value: f64) -> f64 {
        value
    }

    #[inline]
    fn coeff_to_f64(coeff: f64) -> f64 {
        coeff
    }

    #[inline]
    fn mul_coeff(self, coeff: f64) -> Self {
        self * coeff
    }

    #[inline]
    fn scale_half(self) -> Self {
        self * 0.5
    }
}

/// sin/cos that works with and without the standard library.
pub(crate) fn sin_cos(angle: f64) -> (f64, f64) {
    #[cfg(feature = "std")]
    return (angle.sin(), angle.cos());

    #[cfg(not(feature = "std"))]
    return (libm::sin(angle), libm::cos(angle));
}

pub(crate) fn round(value: f64) -> f64 {
    #[cfg(feature = "std")]
    return value.round();

    #[cfg(not(feature = "std"))]
    return libm::round(value);
}
