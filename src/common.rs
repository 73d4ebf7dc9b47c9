// src/common.rs

use alloc::vec::Vec;
use core::fmt;
use num_complex::Complex;

use crate::sample::Sample;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FftError {
    NotPowerOfTwo,
    LaneWidthTooSmall,
    LaneWidthExceedsSize,
    DelayScheduleMismatch { expected: usize, actual: usize },
    UnsupportedPrecision,
    SizeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for FftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FftError::NotPowerOfTwo => write!(f, "Size and lane width must be powers of 2"),
            FftError::LaneWidthTooSmall => write!(f, "Lane width must be at least 2"),
            FftError::LaneWidthExceedsSize => write!(f, "Lane width cannot exceed the FFT size"),
            FftError::DelayScheduleMismatch { expected, actual } => write!(
                f,
                "Delay schedule has {} entries, expected {}",
                actual, expected
            ),
            FftError::UnsupportedPrecision => {
                write!(f, "Numeric precision not supported by the pipeline")
            }
            FftError::SizeMismatch { expected, actual } => write!(
                f,
                "Stream vector carries {} lanes, expected {}",
                actual, expected
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FftError {}

/// Sign of the twiddle exponent.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    /// exp(-2*pi*i*k/N)
    #[default]
    Forward,
    /// exp(+2*pi*i*k/N), unnormalized unless combined with `Scaling::PerStage`.
    Inverse,
}

/// Word growth control applied after every arithmetic stage.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum Scaling {
    #[default]
    None,
    /// Halves both butterfly outputs at each stage; the result is the transform divided by N.
    PerStage,
}

/// One cycle of the streaming interface: P lanes plus the two control flags.
///
/// The data of a cycle with `valid == false` carries no meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamVector<T> {
    pub data: Vec<Complex<T>>,
    pub valid: bool,
    pub sync: bool,
}

impl<T: Sample> StreamVector<T> {
    pub fn new(data: Vec<Complex<T>>, valid: bool, sync: bool) -> Self {
        Self { data, valid, sync }
    }

    /// An empty cycle of `lanes` zeros with `valid` low.
    pub fn idle(lanes: usize) -> Self {
        Self {
            data: alloc::vec![Complex::new(T::ZERO, T::ZERO); lanes],
            valid: false,
            sync: false,
        }
    }

    /// A valid cycle of zeros, used to push the last frame out of the pipeline.
    pub fn zeros(lanes: usize) -> Self {
        Self {
            data: alloc::vec![Complex::new(T::ZERO, T::ZERO); lanes],
            valid: true,
            sync: false,
        }
    }

    /// Splits one frame into `frame.len() / lanes` valid vectors, `sync` set on the first.
    pub fn from_frame(frame: &[Complex<T>], lanes: usize) -> Vec<Self> {
        frame
            .chunks(lanes)
            .enumerate()
            .map(|(cycle, chunk)| Self::new(chunk.to_vec(), true, cycle == 0))
            .collect()
    }
}

/// A cycle-accurate stage of the stream FFT: one call is one clock edge.
pub trait Pipeline<T: Sample> {
    /// Writes the cycle's output into `output`, reusing its buffer.
    fn step_into(&mut self, input: &StreamVector<T>, output: &mut StreamVector<T>) -> Result<(), FftError>;

    fn step(&mut self, input: &StreamVector<T>) -> Result<StreamVector<T>, FftError> {
        let mut output = StreamVector::idle(self.lanes());
        self.step_into(input, &mut output)?;
        Ok(output)
    }

    /// Valid cycles between an input `sync` and the matching output `sync`.
    fn latency(&self) -> usize;

    fn lanes(&self) -> usize;
}

/// Rejects vectors whose width does not match the pipeline.
pub(crate) fn check_width<T>(input: &StreamVector<T>, lanes: usize) -> Result<(), FftError> {
    if input.data.len() != lanes {
        return Err(FftError::SizeMismatch {
            expected: lanes,
            actual: input.data.len(),
        });
    }
    Ok(())
}
