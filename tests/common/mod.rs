#![allow(dead_code)]

use std::f64::consts::PI;

use num_complex::Complex64;
use rs_stream_fft::{Complex, Pipeline, Sample, StreamVector};

/// Naive O(N^2) reference transform.
pub fn dft(x: &[Complex64], inverse: bool) -> Vec<Complex64> {
    let n = x.len();
    let sign = if inverse { 1.0 } else { -1.0 };
    (0..n)
        .map(|k| {
            x.iter()
                .enumerate()
                .map(|(i, &v)| {
                    let angle = sign * 2.0 * PI * ((i * k) % n) as f64 / n as f64;
                    v * Complex64::from_polar(1.0, angle)
                })
                .sum()
        })
        .collect()
}

pub fn max_error(a: &[Complex64], b: &[Complex64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x - y).norm()).fold(0.0, f64::max)
}

/// Deterministic pseudo-random frame with components in [-amplitude, amplitude).
pub fn noise(n: usize, seed: u64, amplitude: f64) -> Vec<Complex64> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((state >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
    };
    (0..n)
        .map(|_| Complex64::new(amplitude * next(), amplitude * next()))
        .collect()
}

pub fn to_samples<T: Sample>(x: &[Complex64]) -> Vec<Complex<T>> {
    x.iter()
        .map(|v| Complex::new(T::from_f64(v.re), T::from_f64(v.im)))
        .collect()
}

pub fn to_f64<T: Sample>(x: &[Complex<T>]) -> Vec<Complex64> {
    x.iter().map(|v| Complex64::new(v.re.to_f64(), v.im.to_f64())).collect()
}

/// Steps every input through the pipeline, keeping only valid outputs.
pub fn run_valid<T: Sample, P: Pipeline<T>>(
    pipeline: &mut P,
    inputs: &[StreamVector<T>],
) -> Vec<StreamVector<T>> {
    inputs
        .iter()
        .map(|v| pipeline.step(v).unwrap())
        .filter(|v| v.valid)
        .collect()
}

/// Frames back to back followed by `flush` valid zero vectors.
pub fn frame_stream<T: Sample>(frames: &[Vec<Complex<T>>], lanes: usize, flush: usize) -> Vec<StreamVector<T>> {
    frames
        .iter()
        .flat_map(|frame| StreamVector::from_frame(frame, lanes))
        .chain((0..flush).map(|_| StreamVector::zeros(lanes)))
        .collect()
}

/// Inserts `gap(i)` idle cycles in front of input `i`.
pub fn with_gaps<T: Sample>(inputs: &[StreamVector<T>], gap: impl Fn(usize) -> usize) -> Vec<StreamVector<T>> {
    let lanes = inputs.first().map_or(0, |v| v.data.len());
    let mut out = Vec::new();
    for (i, v) in inputs.iter().enumerate() {
        out.extend((0..gap(i)).map(|_| StreamVector::idle(lanes)));
        out.push(v.clone());
    }
    out
}
