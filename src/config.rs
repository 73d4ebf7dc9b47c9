// src/config.rs

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::PI;

use num_complex::Complex;

use crate::butterfly::{Rotation, Twiddle};
use crate::common::{Direction, FftError, Scaling};
use crate::sample::{self, Sample};

/// Construction options for a plan. Every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub direction: Direction,
    pub scaling: Scaling,
    /// Registers after each of the log2(P) direct stages. Default: one per stage.
    pub direct_delays: Option<Vec<usize>>,
    /// Registers after each of the log2(N/P) biplex butterfly stages and the
    /// final permutation stage. Default: one per butterfly stage, none after
    /// the permutation.
    pub biplex_delays: Option<Vec<usize>>,
    /// Zero registers wherever no schedule is given: the minimum latency
    /// schedule.
    pub zero_delays: bool,
}

impl Settings {
    pub fn inverse(mut self) -> Self {
        self.direction = Direction::Inverse;
        self
    }

    pub fn scaled(mut self) -> Self {
        self.scaling = Scaling::PerStage;
        self
    }

    pub fn with_delays(mut self, direct: Vec<usize>, biplex: Vec<usize>) -> Self {
        self.direct_delays = Some(direct);
        self.biplex_delays = Some(biplex);
        self
    }

    /// No pipeline registers at all. The schedules are sized once the plan
    /// has validated N and P.
    pub fn combinational() -> Self {
        Self {
            zero_delays: true,
            ..Self::default()
        }
    }
}

/// Immutable plan shared by the direct and biplex networks.
///
/// Holds the twiddle table, the two index tables, the direct network's
/// wiring and the latency bookkeeping, all derived once from (N, P) and the
/// delay schedule.
#[derive(Debug, Clone)]
pub struct Config<T: Sample> {
    n: usize,
    p: usize,
    bp: usize,
    direction: Direction,
    scaling: Scaling,
    twiddles: Vec<Twiddle<T::Coeff>>,
    direct_pairs: Vec<(usize, usize)>,
    direct_index: Vec<usize>,
    direct_delays: Vec<usize>,
    biplex_index: Vec<usize>,
    biplex_spans: Vec<usize>,
    biplex_delays: Vec<usize>,
    bin_order: Vec<usize>,
    output_order: Vec<usize>,
    direct_latency: usize,
    biplex_latency: usize,
}

impl<T: Sample> Config<T> {
    /// Forward, unscaled plan with the default delay schedule.
    pub fn new(n: usize, p: usize) -> Result<Self, FftError> {
        Self::build(n, p, &Settings::default())
    }

    pub fn build(n: usize, p: usize, settings: &Settings) -> Result<Self, FftError> {
        T::check_precision()?;
        if !n.is_power_of_two() || !p.is_power_of_two() {
            return Err(FftError::NotPowerOfTwo);
        }
        if p < 2 {
            return Err(FftError::LaneWidthTooSmall);
        }
        if p > n {
            return Err(FftError::LaneWidthExceedsSize);
        }

        let bp = n / p;
        let (default_direct, default_biplex) = default_delays(n, p, settings.zero_delays);
        let direct_delays = checked_schedule(&settings.direct_delays, default_direct)?;
        let biplex_delays = checked_schedule(&settings.biplex_delays, default_biplex)?;

        let biplex_spans = biplex_spans(bp);
        let bin_order = biplex_bin_order(bp);

        let direct_latency = direct_delays.iter().sum();
        let biplex_latency = biplex_spans.iter().sum::<usize>() + biplex_delays.iter().sum::<usize>();

        let config = Self {
            n,
            p,
            bp,
            direction: settings.direction,
            scaling: settings.scaling,
            twiddles: twiddle_table::<T>(n, settings.direction),
            direct_pairs: direct_pairs(p),
            direct_index: direct_index_table(n, p, &bin_order, &direct_delays),
            biplex_index: biplex_index_table(n, p),
            output_order: output_order(p, &bin_order),
            direct_delays,
            biplex_spans,
            biplex_delays,
            bin_order,
            direct_latency,
            biplex_latency,
        };

        log::debug!(
            "planned {}-point stream FFT: {} lanes, biplex depth {}, latency {} (biplex {}, direct {})",
            n,
            p,
            bp,
            config.latency(),
            biplex_latency,
            direct_latency
        );

        Ok(config)
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn lanes(&self) -> usize {
        self.p
    }

    /// N / P: cycles per frame and depth of the biplex transform.
    pub fn biplex_depth(&self) -> usize {
        self.bp
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn scaling(&self) -> Scaling {
        self.scaling
    }

    pub fn direct_stages(&self) -> usize {
        self.direct_delays.len()
    }

    /// Arithmetic stages of the biplex network; the permutation stage comes on top.
    pub fn biplex_stages(&self) -> usize {
        self.biplex_spans.len().saturating_sub(1)
    }

    pub fn twiddles(&self) -> &[Twiddle<T::Coeff>] {
        &self.twiddles
    }

    pub fn direct_index(&self) -> &[usize] {
        &self.direct_index
    }

    pub fn biplex_index(&self) -> &[usize] {
        &self.biplex_index
    }

    pub fn direct_delays(&self) -> &[usize] {
        &self.direct_delays
    }

    pub fn biplex_delays(&self) -> &[usize] {
        &self.biplex_delays
    }

    /// Commutator delay of every biplex stage, the permutation stage last.
    pub fn biplex_spans(&self) -> &[usize] {
        &self.biplex_spans
    }

    /// Frequency (within the BP-point lane transform) leaving the biplex network
    /// on each cycle of its output frame.
    pub fn bin_order(&self) -> &[usize] {
        &self.bin_order
    }

    /// Frequency bin held by each slot `c * P + lane` of an output frame.
    pub fn output_order(&self) -> &[usize] {
        &self.output_order
    }

    pub fn direct_latency(&self) -> usize {
        self.direct_latency
    }

    pub fn biplex_latency(&self) -> usize {
        self.biplex_latency
    }

    pub fn latency(&self) -> usize {
        self.direct_latency + self.biplex_latency
    }

    /// Lanes combined by butterfly `b` of direct stage `stage`.
    #[inline]
    pub fn direct_pair(&self, stage: usize, b: usize) -> (usize, usize) {
        self.direct_pairs[stage * (self.p / 2) + b]
    }

    #[inline]
    pub fn direct_twiddle(&self, counter: usize, stage: usize, b: usize) -> &Twiddle<T::Coeff> {
        let half = self.p / 2;
        let row = counter * self.direct_stages() * half;
        &self.twiddles[self.direct_index[row + stage * half + b]]
    }

    #[inline]
    pub fn biplex_twiddle(&self, stage: usize, counter: usize) -> &Twiddle<T::Coeff> {
        &self.twiddles[self.biplex_index[stage * self.bp + counter]]
    }

    /// Reorders one output frame (N slots) into natural frequency order.
    pub fn to_natural_order<X: Copy>(&self, slots: &[X]) -> Result<Vec<X>, FftError> {
        if slots.len() != self.n {
            return Err(FftError::SizeMismatch {
                expected: self.n,
                actual: slots.len(),
            });
        }
        let mut natural = slots.to_vec();
        for (slot, &bin) in self.output_order.iter().enumerate() {
            natural[bin] = slots[slot];
        }
        Ok(natural)
    }
}

/// Default schedule: one register after every butterfly stage, or none at
/// all when `zero` is set. Expects validated sizes.
fn default_delays(n: usize, p: usize, zero: bool) -> (Vec<usize>, Vec<usize>) {
    let register = if zero { 0 } else { 1 };
    let direct = vec![register; log2(p)];
    let biplex = if n > p {
        let mut delays = vec![register; log2(n / p)];
        delays.push(0);
        delays
    } else {
        Vec::new()
    };
    (direct, biplex)
}

fn checked_schedule(given: &Option<Vec<usize>>, default: Vec<usize>) -> Result<Vec<usize>, FftError> {
    match given {
        None => Ok(default),
        Some(delays) if delays.len() == default.len() => Ok(delays.clone()),
        Some(delays) => Err(FftError::DelayScheduleMismatch {
            expected: default.len(),
            actual: delays.len(),
        }),
    }
}

#[inline]
pub(crate) fn log2(x: usize) -> usize {
    x.trailing_zeros() as usize
}

/// Reverses the lowest `bits` bits of `x`.
pub fn bit_reverse(x: usize, bits: usize) -> usize {
    if bits == 0 {
        return 0;
    }
    x.reverse_bits() >> (usize::BITS as usize - bits)
}

/// Twiddle factors `exp(-/+ 2*pi*i*k/N)` for k = 0..N/2.
///
/// The two quadrant entries are written exactly and tagged so the butterfly
/// can skip the multiply.
pub fn twiddle_table<T: Sample>(n: usize, direction: Direction) -> Vec<Twiddle<T::Coeff>> {
    let sign = match direction {
        Direction::Forward => -1.0,
        Direction::Inverse => 1.0,
    };
    let coeff = |re: f64, im: f64| Complex::new(T::coeff_from_f64(re), T::coeff_from_f64(im));

    (0..n / 2)
        .map(|k| {
            if k == 0 {
                Twiddle::new(coeff(1.0, 0.0), Rotation::One)
            } else if 4 * k == n {
                match direction {
                    Direction::Forward => Twiddle::new(coeff(0.0, -1.0), Rotation::MinusJ),
                    Direction::Inverse => Twiddle::new(coeff(0.0, 1.0), Rotation::PlusJ),
                }
            } else {
                let angle = sign * 2.0 * PI * (k as f64) / (n as f64);
                let (sin, cos) = sample::sin_cos(angle);
                Twiddle::new(coeff(cos, sin), Rotation::General)
            }
        })
        .collect()
}

/// In-place wiring of the P-point network: stage `s` pairs lanes `h` apart
/// inside groups of `2h`, with `h = P >> (s + 1)`.
pub fn direct_pairs(p: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(log2(p) * p / 2);
    for stage in 0..log2(p) {
        let half = p >> (stage + 1);
        for b in 0..p / 2 {
            let top = (b / half) * 2 * half + b % half;
            pairs.push((top, top + half));
        }
    }
    pairs
}

/// Twiddle index of every direct butterfly, flattened as `[counter][stage][butterfly]`.
///
/// Group `g` of stage `s` sees data whose lane transforms are at bin
/// `k1 = bin_order[c - cum_s]`, `cum_s` being the registers in front of the
/// stage. Its twiddle is `W_N^(h * (k1 + BP * bitrev_s(g)))`, which folds the
/// inter-lane twiddle of the outer decimation into the P-point merge.
pub fn direct_index_table(n: usize, p: usize, bin_order: &[usize], delays: &[usize]) -> Vec<usize> {
    let bp = n / p;
    let stages = log2(p);
    let mut table = Vec::with_capacity(bp * stages * p / 2);

    for counter in 0..bp {
        let mut cum = 0;
        for stage in 0..stages {
            let half = p >> (stage + 1);
            let k1 = bin_order[(counter + bp - cum % bp) % bp];
            for b in 0..p / 2 {
                let group = b / half;
                table.push(half * (k1 + bp * bit_reverse(group, stage)));
            }
            cum += delays[stage];
        }
    }
    table
}

/// Commutator span of each biplex stage: `BP >> (k + 1)` for the butterfly
/// stages, then `BP / 2` for the final permutation. Empty when BP == 1.
pub fn biplex_spans(bp: usize) -> Vec<usize> {
    if bp < 2 {
        return Vec::new();
    }
    let mut spans: Vec<usize> = (0..log2(bp)).map(|k| bp >> (k + 1)).collect();
    spans.push(bp / 2);
    spans
}

/// Sub-transform offset of the block a biplex stage works on, per stage and
/// stage counter value.
///
/// A stage takes its upper lane's block when the rotator bit is set (the
/// block came out of the previous stage as a sum) and the lower lane's
/// block otherwise (a difference, which adds `2^(k-1)` to the offset).
fn biplex_offsets(bp: usize) -> Vec<Vec<usize>> {
    let stages = log2(bp);
    let mut offsets = vec![vec![0; bp]];
    for k in 1..stages {
        let span = bp >> (k + 1);
        let prev_span = bp >> k;
        let prev = &offsets[k - 1];
        let next = (0..bp)
            .map(|t| {
                if (t / span) & 1 == 1 {
                    prev[(t + prev_span) % bp]
                } else {
                    prev[t] + (1 << (k - 1))
                }
            })
            .collect();
        offsets.push(next);
    }
    offsets
}

/// Twiddle index of the biplex butterflies, flattened as `[stage][counter]`.
/// Every lane pair uses the same entry.
pub fn biplex_index_table(n: usize, p: usize) -> Vec<usize> {
    let bp = n / p;
    if bp < 2 {
        return Vec::new();
    }
    biplex_offsets(bp)
        .iter()
        .enumerate()
        .flat_map(|(k, offsets)| offsets.iter().map(move |&a| p * (bp >> (k + 1)) * a))
        .collect()
}

/// Bin leaving the biplex network on each cycle of its output frame.
///
/// The top bit of the counter is the last stage's sum/difference choice; the
/// remaining bits come out reversed.
pub fn biplex_bin_order(bp: usize) -> Vec<usize> {
    if bp < 2 {
        return vec![0];
    }
    let stages = log2(bp);
    let half = bp / 2;
    let offsets = biplex_offsets(bp);
    let last = &offsets[stages - 1];
    (0..bp)
        .map(|t| last[(t + half + 1) % bp] + (((t / half) & 1) << (stages - 1)))
        .collect()
}

/// Bin of every output slot `c * P + lane`.
fn output_order(p: usize, bin_order: &[usize]) -> Vec<usize> {
    let bp = bin_order.len();
    let bits = log2(p);
    let mut order = Vec::with_capacity(bp * p);
    for &k1 in bin_order {
        for lane in 0..p {
            order.push(k1 + bp * bit_reverse(lane, bits));
        }
    }
    order
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
