//! Encoder quality levels.
//!
//! Qualities are stored as whole hundredths so that stepping down from 0.9 by
//! 0.1 lands exactly on 0.1 instead of accumulating float error.

use std::fmt;

/// Encoder fidelity in `[0.0, 1.0]`, with hundredth precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualityLevel(u8);

impl QualityLevel {
    /// Number of steps in the unit interval.
    pub const SCALE: u8 = 100;

    pub const MIN: QualityLevel = QualityLevel(0);
    pub const MAX: QualityLevel = QualityLevel(Self::SCALE);

    /// Build from a fraction, rounded to the nearest hundredth.
    ///
    /// Returns `None` for NaN or values outside `[0.0, 1.0]`.
    pub fn new(value: f32) -> Option<Self> {
        if !(0.0..=1.0).contains(&value) {
            return None;
        }
        Some(Self((value * f32::from(Self::SCALE)).round() as u8))
    }

    /// Build from whole hundredths (`90` is quality 0.9).
    pub fn from_hundredths(hundredths: u8) -> Option<Self> {
        (hundredths <= Self::SCALE).then_some(Self(hundredths))
    }

    /// Const constructor for literal qualities. Panics if `hundredths > 100`.
    pub(crate) const fn from_hundredths_const(hundredths: u8) -> Self {
        assert!(hundredths <= Self::SCALE);
        Self(hundredths)
    }

    pub fn hundredths(self) -> u8 {
        self.0
    }

    pub fn as_f32(self) -> f32 {
        f32::from(self.0) / f32::from(Self::SCALE)
    }

    /// Quality on the 1-100 scale used by JPEG encoders.
    ///
    /// Zero is raised to 1, the lowest value encoders accept.
    pub fn as_jpeg_quality(self) -> u8 {
        self.0.max(1)
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_f32())
    }
}
