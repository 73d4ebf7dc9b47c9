// src/fixed/types/fixed.rs

use core::fmt;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::common::FftError;
use crate::sample::{self, Sample};

/// Fractional bits of the twiddle coefficients (Q30).
/// One integer bit is kept so that 1.0 and -1.0 are exact.
pub const TWIDDLE_FRAC: u32 = 30;

/// Largest data precision accepted by a plan: the sign bit plus one integer bit.
pub const MAX_FRAC: u32 = 30;

/// Generic fixed-point structure based on the number of fractional bits (FRAC).
/// The internal value is stored as a signed 32-bit integer.
///
/// Arithmetic wraps on overflow (two's complement, like a hardware adder).
/// Conversions from `f64` round to nearest and saturate.
///
/// FRAC must be at most 31; larger values fail to compile once a conversion
/// is used.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Fixed<const FRAC: u32>(i32);

impl<const FRAC: u32> Fixed<FRAC> {
    const FRAC_FITS: () = assert!(FRAC < 32, "Fixed<FRAC> holds at most 31 fractional bits");

    /// Creates a Fixed from the raw integer value (without shift).
    #[inline]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Creates a Fixed from an integer, applying the necessary shift.
    /// E.g.: Fixed::<8>::from_int(1) will result in internal value 256.
    #[inline]
    pub fn from_int(value: i32) -> Self {
        let () = Self::FRAC_FITS;
        Self(value.wrapping_shl(FRAC))
    }

    /// Converts an f64 to Fixed, applying correct rounding.
    pub fn from_f64(value: f64) -> Self {
        let () = Self::FRAC_FITS;
        let scaling_factor = (1u64 << FRAC) as f64;
        // `as` saturates out-of-range values
        Self(sample::round(value * scaling_factor) as i32)
    }

    pub fn to_f64(self) -> f64 {
        let () = Self::FRAC_FITS;
        self.0 as f64 / (1u64 << FRAC) as f64
    }

    /// Returns the stored raw value.
    #[inline]
    pub fn to_bits(self) -> i32 {
        self.0
    }

    /// Scales the value by 0.5 (arithmetic shift right by 1).
    #[inline]
    pub fn scale_half(self) -> Self {
        Self(self.0 >> 1)
    }

    #[inline]
    pub fn convert<const TO_FRAC: u32>(self) -> Fixed<TO_FRAC> {
        if TO_FRAC > FRAC {
            Fixed::from_bits(self.0.wrapping_shl(TO_FRAC - FRAC))
        } else {
            Fixed::from_bits(self.0 >> (FRAC - TO_FRAC))
        }
    }
}

impl<const F1: u32, const F2: u32> Add<Fixed<F2>> for Fixed<F1> {
    type Output = Fixed<F1>;

    #[inline]
    fn add(self, rhs: Fixed<F2>) -> Self::Output {
        // When F1 == F2, convert is a no-op
        let rhs: Fixed<F1> = rhs.convert();
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl<const F1: u32, const F2: u32> AddAssign<Fixed<F2>> for Fixed<F1> {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed<F2>) {
        *self = *self + rhs;
    }
}

impl<const F1: u32, const F2: u32> Sub<Fixed<F2>> for Fixed<F1> {
    type Output = Fixed<F1>;

    #[inline]
    fn sub(self, rhs: Fixed<F2>) -> Self::Output {
        let rhs: Fixed<F1> = rhs.convert();
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl<const F1: u32, const F2: u32> SubAssign<Fixed<F2>> for Fixed<F1> {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed<F2>) {
        *self = *self - rhs;
    }
}

impl<const F1: u32, const F2: u32> Mul<Fixed<F2>> for Fixed<F1> {
    type Output = Fixed<F1>;

    /// The result keeps the precision of the left operand, rounded to nearest.
    #[inline]
    fn mul(self, rhs: Fixed<F2>) -> Self::Output {
        let product = self.0 as i64 * rhs.0 as i64;

        let rounded = if F2 > 0 {
            let offset = 1i64 << (F2 - 1);
            (product + offset) >> F2
        } else {
            product
        };

        Fixed(rounded as i32)
    }
}

impl<const F1: u32, const F2: u32> MulAssign<Fixed<F2>> for Fixed<F1> {
    #[inline]
    fn mul_assign(&mut self, rhs: Fixed<F2>) {
        *self = *self * rhs;
    }
}

impl<const FRAC: u32> Neg for Fixed<FRAC> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Fixed(self.0.wrapping_neg())
    }
}

impl<const FRAC: u32> Sample for Fixed<FRAC> {
    type Coeff = Fixed<TWIDDLE_FRAC>;

    const ZERO: Self = Fixed(0);

    #[inline]
    fn from_f64(value: f64) -> Self {
        Fixed::<FRAC>::from_f64(value)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        Fixed::<FRAC>::to_f64(self)
    }

    #[inline]
    fn coeff_from_f64(value: f64) -> Self::Coeff {
        Fixed::<TWIDDLE_FRAC>::from_f64(value)
    }

    #[inline]
    fn coeff_to_f64(coeff: Self::Coeff) -> f64 {
        coeff.to_f64()
    }

    #[inline]
    fn mul_coeff(self, coeff: Self::Coeff) -> Self {
        self * coeff
    }

    #[inline]
    fn scale_half(self) -> Self {
        Fixed::<FRAC>::scale_half(self)
    }

    fn check_precision() -> Result<(), FftError> {
        if FRAC > MAX_FRAC {
            return Err(FftError::UnsupportedPrecision);
        }
        Ok(())
    }
}

impl<const FRAC: u32> fmt::Display for Fixed<FRAC> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.to_f64())
    }
}

impl<const FRAC: u32> fmt::Debug for Fixed<FRAC> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // In Debug, show both the decimal value and the raw value in parentheses
        write!(f, "{:.6} (raw: {})", self.to_f64(), self.0)
    }
}
