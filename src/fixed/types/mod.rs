mod fixed;

pub use fixed::{Fixed, MAX_FRAC, TWIDDLE_FRAC};
