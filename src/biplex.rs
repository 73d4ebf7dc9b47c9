// src/biplex.rs

use alloc::vec::Vec;

use num_complex::Complex;

use crate::butterfly::{butterfly, scale};
use crate::common::{check_width, FftError, Pipeline, StreamVector};
use crate::config::Config;
use crate::delay::DelayLine;
use crate::sample::Sample;

/// One commutator stage shared by every lane pair.
struct BiplexStage<T: Sample> {
    span: usize,
    arithmetic: bool,
    /// Per lane pair: the lower input is delayed before the switch, the
    /// first switch output after it.
    lower: Vec<DelayLine<Complex<T>>>,
    upper: Vec<DelayLine<Complex<T>>>,
    registers: Vec<DelayLine<Complex<T>>>,
}

impl<T: Sample> BiplexStage<T> {
    fn new(span: usize, delay: usize, arithmetic: bool, lanes: usize) -> Self {
        let zero = Complex::new(T::ZERO, T::ZERO);
        let line = |len: usize, count: usize| -> Vec<DelayLine<Complex<T>>> {
            (0..count).map(|_| DelayLine::new(len, zero)).collect()
        };
        Self {
            span,
            arithmetic,
            lower: line(span, lanes / 2),
            upper: line(span, lanes / 2),
            registers: line(delay, lanes),
        }
    }

    fn clear(&mut self) {
        self.lower
            .iter_mut()
            .chain(self.upper.iter_mut())
            .chain(self.registers.iter_mut())
            .for_each(DelayLine::clear);
    }
}

/// Time-multiplexed BP-point transform, one per pair of adjacent lanes.
///
/// Each lane pair carries two interleaved sequences of BP samples. Every
/// stage delays the lower lane by its span, swaps the two lanes on alternate
/// span-long blocks and delays the upper result by the span again, which
/// brings the two butterfly operands into the same cycle. The final stage
/// only swaps, leaving each lane with a whole BP-point spectrum in the
/// order given by [`Config::bin_order`].
pub struct BiplexNetwork<'a, T: Sample> {
    config: &'a Config<T>,
    counter: usize,
    /// Stage counters are the input counter delayed through each stage.
    counter_delays: Vec<DelayLine<usize>>,
    stages: Vec<BiplexStage<T>>,
    sync_delay: DelayLine<bool>,
}

impl<'a, T: Sample> BiplexNetwork<'a, T> {
    pub fn new(config: &'a Config<T>) -> Self {
        let arithmetic = config.biplex_stages();
        let spans = config.biplex_spans();
        let delays = config.biplex_delays();

        let counter_delays = (0..arithmetic)
            .map(|k| DelayLine::new(spans[k] + delays[k], 0))
            .collect();
        let stages = spans
            .iter()
            .zip(delays)
            .enumerate()
            .map(|(k, (&span, &delay))| BiplexStage::new(span, delay, k < arithmetic, config.lanes()))
            .collect();

        Self {
            config,
            counter: 0,
            counter_delays,
            stages,
            sync_delay: DelayLine::new(config.biplex_latency(), false),
        }
    }

    pub fn config(&self) -> &'a Config<T> {
        self.config
    }

    /// Counter value that the next cycle will use unless it carries `sync`.
    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn reset(&mut self) {
        self.counter = 0;
        self.counter_delays.iter_mut().for_each(DelayLine::clear);
        self.stages.iter_mut().for_each(BiplexStage::clear);
        self.sync_delay.clear();
    }
}

impl<'a, T: Sample> Pipeline<T> for BiplexNetwork<'a, T> {
    fn step_into(&mut self, input: &StreamVector<T>, output: &mut StreamVector<T>) -> Result<(), FftError> {
        let config = self.config;
        check_width(input, config.lanes())?;

        let valid = input.valid;
        let count = if valid && input.sync { 0 } else { self.counter };
        if valid {
            self.counter = (count + 1) % config.biplex_depth();
        }

        let lanes = &mut output.data;
        lanes.clear();
        lanes.extend_from_slice(&input.data);
        let mut tau = count;
        for (k, stage) in self.stages.iter_mut().enumerate() {
            let swap = (tau / stage.span) & 1 == 1;
            for q in 0..lanes.len() / 2 {
                let (top, bottom) = (2 * q, 2 * q + 1);
                let delayed = stage.lower[q].step(lanes[bottom], valid);
                let (u, v) = if swap {
                    (delayed, lanes[top])
                } else {
                    (lanes[top], delayed)
                };
                let u = stage.upper[q].step(u, valid);
                let (x, y) = if stage.arithmetic {
                    let twiddle = config.biplex_twiddle(k, tau);
                    scale(butterfly(u, v, twiddle), config.scaling())
                } else {
                    (u, v)
                };
                lanes[top] = x;
                lanes[bottom] = y;
            }
            for (lane, register) in lanes.iter_mut().zip(stage.registers.iter_mut()) {
                *lane = register.step(*lane, valid);
            }
            if let Some(delay) = self.counter_delays.get_mut(k) {
                tau = delay.step(tau, valid);
            }
        }

        let sync = self.sync_delay.step(input.sync, valid);
        output.valid = valid;
        output.sync = valid && sync;
        Ok(())
    }

    fn latency(&self) -> usize {
        self.config.biplex_latency()
    }

    fn lanes(&self) -> usize {
        self.config.lanes()
    }
}

#[cfg(test)]
#[path = "biplex_tests.rs"]
mod tests;
