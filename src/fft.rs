// src/fft.rs

use alloc::vec::Vec;

use num_complex::Complex;

use crate::biplex::BiplexNetwork;
use crate::common::{FftError, Pipeline, StreamVector};
use crate::config::Config;
use crate::direct::DirectNetwork;
use crate::sample::Sample;

/// Streaming N-point FFT over P lanes.
///
/// Each lane pair runs a BP-point biplex transform over the frame, then the
/// direct network merges the P lane spectra bin by bin. A frame enters as
/// N/P consecutive valid vectors in natural order, `sync` on the first, and
/// leaves `latency()` valid cycles later in the order given by
/// [`Config::output_order`].
///
/// # Example
///
/// ```
/// use rs_stream_fft::{Complex, Config, StreamFft};
///
/// let config = Config::<f64>::new(8, 2).unwrap();
/// let mut fft = StreamFft::new(&config);
///
/// let mut impulse = vec![Complex::new(0.0, 0.0); 8];
/// impulse[0] = Complex::new(1.0, 0.0);
///
/// let spectra = fft.transform_frames(&[impulse]).unwrap();
/// assert!(spectra[0].iter().all(|bin| (bin - Complex::new(1.0, 0.0)).norm() < 1e-12));
/// ```
pub struct StreamFft<'a, T: Sample> {
    config: &'a Config<T>,
    biplex: Option<BiplexNetwork<'a, T>>,
    direct: DirectNetwork<'a, T>,
    /// Biplex output of the current cycle, reused every cycle.
    between: StreamVector<T>,
}

impl<'a, T: Sample> StreamFft<'a, T> {
    pub fn new(config: &'a Config<T>) -> Self {
        let biplex = if config.n() > config.lanes() {
            Some(BiplexNetwork::new(config))
        } else {
            None
        };
        Self {
            config,
            biplex,
            direct: DirectNetwork::new(config),
            between: StreamVector::idle(config.lanes()),
        }
    }

    pub fn config(&self) -> &'a Config<T> {
        self.config
    }

    pub fn latency(&self) -> usize {
        self.config.latency()
    }

    pub fn reset(&mut self) {
        if let Some(biplex) = self.biplex.as_mut() {
            biplex.reset();
        }
        self.direct.reset();
    }

    /// Runs whole frames through a cleared pipeline, back to back, and
    /// returns their spectra in natural frequency order.
    pub fn transform_frames(
        &mut self,
        frames: &[Vec<Complex<T>>],
    ) -> Result<Vec<Vec<Complex<T>>>, FftError> {
        let n = self.config.n();
        let lanes = self.config.lanes();
        if let Some(frame) = frames.iter().find(|frame| frame.len() != n) {
            return Err(FftError::SizeMismatch {
                expected: n,
                actual: frame.len(),
            });
        }

        self.reset();

        let flush = (0..self.latency()).map(|_| StreamVector::zeros(lanes));
        let inputs = frames
            .iter()
            .flat_map(|frame| StreamVector::from_frame(frame, lanes))
            .chain(flush);

        let mut output = StreamVector::idle(lanes);
        let mut slots: Vec<Vec<Complex<T>>> = Vec::with_capacity(frames.len());
        for input in inputs {
            self.step_into(&input, &mut output)?;
            if !output.valid {
                continue;
            }
            if output.sync {
                log::trace!("frame {} leaving the pipeline", slots.len());
                slots.push(Vec::with_capacity(n));
            }
            if let Some(current) = slots.last_mut() {
                if current.len() < n {
                    current.extend_from_slice(&output.data);
                }
            }
        }

        slots
            .iter()
            .take(frames.len())
            .map(|frame| self.config.to_natural_order(frame))
            .collect()
    }
}

impl<'a, T: Sample> Pipeline<T> for StreamFft<'a, T> {
    fn step_into(&mut self, input: &StreamVector<T>, output: &mut StreamVector<T>) -> Result<(), FftError> {
        match self.biplex.as_mut() {
            Some(biplex) => {
                biplex.step_into(input, &mut self.between)?;
                self.direct.step_into(&self.between, output)
            }
            None => self.direct.step_into(input, output),
        }
    }

    fn latency(&self) -> usize {
        self.config.latency()
    }

    fn lanes(&self) -> usize {
        self.config.lanes()
    }
}

#[cfg(test)]
#[path = "fft_tests.rs"]
mod tests;
