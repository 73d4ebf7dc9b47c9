pub mod types;

pub use types::{Fixed, MAX_FRAC, TWIDDLE_FRAC};

/// Q15 samples: 16 integer bits of headroom for spectral growth.
pub type Q15 = Fixed<15>;
