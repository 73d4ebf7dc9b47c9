#![no_std]

// The pipeline state (delay lines, tables) is sized at run time from N and P.
extern crate alloc;

// Enables the standard library for tests and for the "std" feature,
// so you can run 'cargo test' on your PC normally.
#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod common;
pub mod sample;
pub mod fixed;
pub mod butterfly;
pub mod delay;
pub mod config;
pub mod direct;
pub mod biplex;
pub mod fft;

pub use common::{Direction, FftError, Pipeline, Scaling, StreamVector};
pub use config::{Config, Settings};
pub use fft::StreamFft;
pub use fixed::Fixed;
pub use num_complex::Complex;
pub use sample::Sample;
