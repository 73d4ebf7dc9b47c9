// src/butterfly.rs

use num_complex::Complex;

use crate::common::Scaling;
use crate::sample::Sample;

/// How a twiddle factor is applied to the second butterfly operand.
///
/// Quadrant values are exact in every representation, so they are applied
/// by swapping and negating components instead of multiplying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    One,
    /// Never produced by the plan's table, which stops short of k = N/2;
    /// available for twiddles built by the caller.
    MinusOne,
    MinusJ,
    PlusJ,
    General,
}

/// A twiddle factor as stored in the plan's table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Twiddle<C> {
    pub value: Complex<C>,
    pub rotation: Rotation,
}

impl<C> Twiddle<C> {
    pub fn new(value: Complex<C>, rotation: Rotation) -> Self {
        Self { value, rotation }
    }
}

/// Full complex multiply `b * w`.
#[inline]
pub fn complex_mul<T: Sample>(b: Complex<T>, w: Complex<T::Coeff>) -> Complex<T> {
    // (ac - bd) + (ad + bc)i
    Complex::new(
        b.re.mul_coeff(w.re) - b.im.mul_coeff(w.im),
        b.re.mul_coeff(w.im) + b.im.mul_coeff(w.re),
    )
}

#[inline]
pub fn rotate<T: Sample>(b: Complex<T>, twiddle: &Twiddle<T::Coeff>) -> Complex<T> {
    match twiddle.rotation {
        Rotation::One => b,
        Rotation::MinusOne => Complex::new(-b.re, -b.im),
        // (x + iy) * -i = y - ix
        Rotation::MinusJ => Complex::new(b.im, -b.re),
        // (x + iy) * i = -y + ix
        Rotation::PlusJ => Complex::new(-b.im, b.re),
        Rotation::General => complex_mul(b, twiddle.value),
    }
}

/// Radix-2 DIT butterfly: `(a + b*w, a - b*w)`.
#[inline]
pub fn butterfly<T: Sample>(
    a: Complex<T>,
    b: Complex<T>,
    twiddle: &Twiddle<T::Coeff>,
) -> (Complex<T>, Complex<T>) {
    combine(a, rotate(b, twiddle))
}

/// Same butterfly without the quadrant shortcut: always multiplies.
#[inline]
pub fn butterfly_general<T: Sample>(
    a: Complex<T>,
    b: Complex<T>,
    w: Complex<T::Coeff>,
) -> (Complex<T>, Complex<T>) {
    combine(a, complex_mul(b, w))
}

#[inline]
fn combine<T: Sample>(a: Complex<T>, t: Complex<T>) -> (Complex<T>, Complex<T>) {
    (
        Complex::new(a.re + t.re, a.im + t.im),
        Complex::new(a.re - t.re, a.im - t.im),
    )
}

/// Applies the stage normalization chosen in the plan.
#[inline]
pub(crate) fn scale<T: Sample>(
    (x, y): (Complex<T>, Complex<T>),
    scaling: Scaling,
) -> (Complex<T>, Complex<T>) {
    match scaling {
        Scaling::None => (x, y),
        Scaling::PerStage => (
            Complex::new(x.re.scale_half(), x.im.scale_half()),
            Complex::new(y.re.scale_half(), y.im.scale_half()),
        ),
    }
}

#[cfg(test)]
#[path = "butterfly_tests.rs"]
mod tests;
