use std::fmt;

use crate::error::{Error, Result};

/// Playback speed in compressed bits revealed per second. Always positive.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct BitRate(f64);

impl BitRate {
    pub const DEFAULT: BitRate = BitRate(64.0);

    /// Validate an operator-supplied rate
    pub fn new(bits_per_second: f64) -> Result<Self> {
        if bits_per_second.is_finite() && bits_per_second > 0.0 {
            Ok(Self(bits_per_second))
        } else {
            Err(Error::InvalidBitRate(bits_per_second))
        }
    }

    pub fn bits_per_second(&self) -> f64 {
        self.0
    }
}

impl Default for BitRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for BitRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bps", self.0)
    }
}
