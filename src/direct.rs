// src/direct.rs

use alloc::vec::Vec;

use num_complex::Complex;

use crate::butterfly::{butterfly, scale};
use crate::common::{check_width, FftError, Pipeline, StreamVector};
use crate::config::Config;
use crate::delay::DelayLine;
use crate::sample::Sample;

/// Fully unrolled P-point network.
///
/// Consumes one P-wide vector per cycle in natural lane order and emits the
/// P-point merge in bit-reversed lane order. Its counter tracks which bin of
/// the lane transforms is passing through, so each stage can pick the
/// matching twiddle row.
pub struct DirectNetwork<'a, T: Sample> {
    config: &'a Config<T>,
    counter: usize,
    /// Per stage, one register line per lane.
    registers: Vec<Vec<DelayLine<Complex<T>>>>,
    sync_delay: DelayLine<bool>,
}

impl<'a, T: Sample> DirectNetwork<'a, T> {
    pub fn new(config: &'a Config<T>) -> Self {
        let zero = Complex::new(T::ZERO, T::ZERO);
        let registers = config
            .direct_delays()
            .iter()
            .map(|&len| (0..config.lanes()).map(|_| DelayLine::new(len, zero)).collect())
            .collect();

        Self {
            config,
            counter: 0,
            registers,
            sync_delay: DelayLine::new(config.direct_latency(), false),
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
        self.registers.iter_mut().flatten().for_each(DelayLine::clear);
        self.sync_delay.clear();
    }
}

impl<'a, T: Sample> Pipeline<T> for DirectNetwork<'a, T> {
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
        for (stage, registers) in self.registers.iter_mut().enumerate() {
            for b in 0..config.lanes() / 2 {
                let (top, bottom) = config.direct_pair(stage, b);
                let twiddle = config.direct_twiddle(count, stage, b);
                let (x, y) = scale(butterfly(lanes[top], lanes[bottom], twiddle), config.scaling());
                lanes[top] = x;
                lanes[bottom] = y;
            }
            for (lane, register) in lanes.iter_mut().zip(registers.iter_mut()) {
                *lane = register.step(*lane, valid);
            }
        }

        let sync = self.sync_delay.step(input.sync, valid);
        output.valid = valid;
        output.sync = valid && sync;
        Ok(())
    }

    fn latency(&self) -> usize {
        self.config.direct_latency()
    }

    fn lanes(&self) -> usize {
        self.config.lanes()
    }
}

#[cfg(test)]
#[path = "direct_tests.rs"]
mod tests;
