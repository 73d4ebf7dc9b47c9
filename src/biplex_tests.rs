use super::*;
use crate::config::Settings;
use crate::fixed::Fixed;
use num_complex::Complex64;
use std::f64::consts::PI;
use std::vec;
use std::vec::Vec;

const EPSILON: f64 = 1e-9;

fn assert_cplx_eq(a: Complex64, b: Complex64) {
    assert!((a - b).norm() < EPSILON, "Complex mismatch: {} vs {}", a, b);
}

fn frame(n: usize) -> Vec<Complex64> {
    (0..n)
        .map(|i| Complex64::new((0.7 * i as f64) % 1.3, (0.3 * (i * i) as f64) % 0.9))
        .collect()
}

/// BP-point DFT of the samples landing on `lane`, at bin `k`.
fn lane_dft(frame: &[Complex64], p: usize, lane: usize, k: usize) -> Complex64 {
    let bp = frame.len() / p;
    (0..bp)
        .map(|m| {
            let angle = -2.0 * PI * (m * k) as f64 / bp as f64;
            frame[m * p + lane] * Complex64::from_polar(1.0, angle)
        })
        .sum()
}

/// Feeds one frame followed by zeros and returns every output cycle.
fn run_frame(biplex: &mut BiplexNetwork<f64>, x: &[Complex64]) -> Vec<StreamVector<f64>> {
    let config = biplex.config();
    let flush = config.biplex_latency() + config.biplex_depth();
    let mut inputs = StreamVector::from_frame(x, config.lanes());
    inputs.extend((0..flush).map(|_| StreamVector::zeros(config.lanes())));
    inputs.iter().map(|v| biplex.step(v).unwrap()).collect()
}

fn check_lane_spectra(n: usize, p: usize) {
    let config = Config::<f64>::new(n, p).unwrap();
    let mut biplex = BiplexNetwork::new(&config);
    let x = frame(n);
    let outputs = run_frame(&mut biplex, &x);

    let latency = config.biplex_latency();
    let syncs: Vec<usize> = (0..outputs.len()).filter(|&i| outputs[i].sync).collect();
    assert_eq!(syncs, vec![latency]);

    for (c, &k) in config.bin_order().iter().enumerate() {
        let out = &outputs[latency + c];
        for lane in 0..p {
            assert_cplx_eq(out.data[lane], lane_dft(&x, p, lane, k));
        }
    }
}

#[test]
fn test_lane_spectra_8_2() {
    check_lane_spectra(8, 2);
}

#[test]
fn test_lane_spectra_16_4() {
    check_lane_spectra(16, 4);
}

#[test]
fn test_lane_spectra_out_of_order() {
    // BP = 16: bins leave in partially bit-reversed order.
    check_lane_spectra(32, 2);
}

#[test]
fn test_two_point_biplex() {
    check_lane_spectra(4, 2);
}

#[test]
fn test_latency_with_custom_delays() {
    let settings = Settings::default().with_delays(vec![1], vec![2, 0, 1]);
    let config = Config::<f64>::build(8, 2, &settings).unwrap();
    // spans 2 + 1 + 2, registers 2 + 0 + 1
    assert_eq!(config.biplex_latency(), 8);

    let mut biplex = BiplexNetwork::new(&config);
    let x = frame(8);
    let outputs = run_frame(&mut biplex, &x);
    assert!(outputs[8].sync);
    for (c, &k) in config.bin_order().iter().enumerate() {
        for lane in 0..2 {
            assert_cplx_eq(outputs[8 + c].data[lane], lane_dft(&x, 2, lane, k));
        }
    }
}

#[test]
fn test_gaps_do_not_change_results() {
    let config = Config::<f64>::new(16, 4).unwrap();
    let x = frame(16);

    let mut reference = BiplexNetwork::new(&config);
    let expected: Vec<StreamVector<f64>> = run_frame(&mut reference, &x)
        .into_iter()
        .filter(|v| v.valid)
        .collect();

    let mut gapped = BiplexNetwork::new(&config);
    let mut inputs = StreamVector::from_frame(&x, 4);
    inputs.extend((0..config.biplex_latency() + 4).map(|_| StreamVector::zeros(4)));

    let mut outputs = Vec::new();
    for (i, v) in inputs.iter().enumerate() {
        for _ in 0..i % 3 {
            let idle = gapped.step(&StreamVector::idle(4)).unwrap();
            assert!(!idle.valid && !idle.sync);
        }
        outputs.push(gapped.step(v).unwrap());
    }

    assert_eq!(outputs, expected);
}

#[test]
fn test_permutation_stage_is_exact() {
    // Q15 samples with unit twiddles only: N = 8, P = 4 gives BP = 2, a single
    // butterfly stage with W^0 and a permutation, so nothing is rounded.
    let config = Config::<Fixed<15>>::new(8, 4).unwrap();
    let mut biplex = BiplexNetwork::new(&config);
    let q = |v: f64| Complex::new(Fixed::<15>::from_f64(v), Fixed::<15>::ZERO);

    let first = StreamVector::new(vec![q(0.25), q(0.125), q(-0.5), q(0.0625)], true, true);
    let second = StreamVector::new(vec![q(0.125), q(0.25), q(0.25), q(-0.0625)], true, false);
    biplex.step(&first).unwrap();
    biplex.step(&second).unwrap();

    let mut outputs = Vec::new();
    for _ in 0..4 {
        outputs.push(biplex.step(&StreamVector::zeros(4)).unwrap());
    }

    let latency = config.biplex_latency();
    assert_eq!(latency, 3);
    let sum = &outputs[latency - 2];
    let diff = &outputs[latency - 1];
    assert!(sum.sync);
    assert_eq!(sum.data, vec![q(0.375), q(0.375), q(-0.25), q(0.0)]);
    assert_eq!(diff.data, vec![q(0.125), q(-0.125), q(-0.75), q(0.125)]);
}

#[test]
fn test_reset_clears_state() {
    let config = Config::<f64>::new(8, 2).unwrap();
    let mut biplex = BiplexNetwork::new(&config);
    let x = frame(8);
    let first = run_frame(&mut biplex, &x);

    biplex.step(&StreamVector::new(vec![Complex64::new(5.0, 5.0); 2], true, true)).unwrap();
    assert_eq!(biplex.counter(), 1);
    biplex.reset();
    assert_eq!(biplex.counter(), 0);

    assert_eq!(run_frame(&mut biplex, &x), first);
}

#[test]
fn test_width_mismatch() {
    let config = Config::<f64>::new(8, 2).unwrap();
    let mut biplex = BiplexNetwork::new(&config);
    assert_eq!(
        biplex.step(&StreamVector::zeros(4)),
        Err(FftError::SizeMismatch { expected: 2, actual: 4 })
    );
}

#[test]
fn test_sync_on_idle_cycle_is_ignored() {
    let config = Config::<f64>::new(16, 4).unwrap();
    let x = frame(16);
    let mut clean = BiplexNetwork::new(&config);
    let expected = run_frame(&mut clean, &x);

    let mut biplex = BiplexNetwork::new(&config);
    let mut inputs = StreamVector::from_frame(&x, 4);
    inputs.extend((0..config.biplex_latency() + 4).map(|_| StreamVector::zeros(4)));

    let mut outputs = Vec::new();
    for (c, v) in inputs.iter().enumerate() {
        if c == 2 {
            let before = biplex.counter();
            let stray = StreamVector::new(vec![Complex64::new(3.0, 1.0); 4], false, true);
            let out = biplex.step(&stray).unwrap();
            assert!(!out.valid && !out.sync);
            assert_eq!(biplex.counter(), before);
        }
        outputs.push(biplex.step(v).unwrap());
    }

    assert_eq!(outputs, expected);
}
