//! Search parameters: byte budget and quality schedule.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quality::QualityLevel;

/// Errors from building a [`Budget`] or [`CompressConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Budget must be at least one byte")]
    ZeroBudget,

    #[error("{field} must be between 0 and 1, got {value}")]
    QualityOutOfRange { field: &'static str, value: f32 },

    #[error("Quality step must be at least 0.01, got {0}")]
    ZeroStep(f32),

    #[error("Floor quality ({floor}) is above initial quality ({initial})")]
    FloorAboveInitial { initial: f32, floor: f32 },
}

/// Maximum acceptable output size in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Budget(NonZeroUsize);

impl Budget {
    /// 2 MiB, the reference upload limit.
    pub const DEFAULT: Budget = match NonZeroUsize::new(2 * 1024 * 1024) {
        Some(bytes) => Budget(bytes),
        None => unreachable!(),
    };

    pub fn new(bytes: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(bytes)
            .map(Budget)
            .ok_or(ConfigError::ZeroBudget)
    }

    pub fn bytes(self) -> usize {
        self.0.get()
    }

    /// Whether `size` bytes fit within this budget.
    pub fn admits(self, size: usize) -> bool {
        size <= self.bytes()
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Quality schedule for the descending search.
///
/// Always valid once constructed: `floor <= initial` and `step >= 0.01`.
/// Deserialization goes through the same checks as [`CompressConfig::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCompressConfig", into = "RawCompressConfig")]
pub struct CompressConfig {
    initial: QualityLevel,
    step: QualityLevel,
    floor: QualityLevel,
}

/// Wire form of [`CompressConfig`]; missing fields take the defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
struct RawCompressConfig {
    initial_quality: f32,
    step: f32,
    floor_quality: f32,
}

impl Default for RawCompressConfig {
    fn default() -> Self {
        CompressConfig::default().into()
    }
}

impl TryFrom<RawCompressConfig> for CompressConfig {
    type Error = ConfigError;

    fn try_from(raw: RawCompressConfig) -> Result<Self, Self::Error> {
        CompressConfig::new(raw.initial_quality, raw.step, raw.floor_quality)
    }
}

impl From<CompressConfig> for RawCompressConfig {
    fn from(config: CompressConfig) -> Self {
        Self {
            initial_quality: config.initial.as_f32(),
            step: config.step.as_f32(),
            floor_quality: config.floor.as_f32(),
        }
    }
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl CompressConfig {
    /// Start at 0.9, step down by 0.1, stop at 0.1.
    pub const DEFAULT: CompressConfig = CompressConfig {
        initial: QualityLevel::from_hundredths_const(90),
        step: QualityLevel::from_hundredths_const(10),
        floor: QualityLevel::from_hundredths_const(10),
    };

    /// Build a schedule from fractional qualities.
    ///
    /// Values are rounded to the nearest hundredth.
    pub fn new(initial_quality: f32, step: f32, floor_quality: f32) -> Result<Self, ConfigError> {
        let initial = parse_quality("initial_quality", initial_quality)?;
        let floor = parse_quality("floor_quality", floor_quality)?;
        let step_level = parse_quality("step", step)?;

        if step_level.hundredths() == 0 {
            return Err(ConfigError::ZeroStep(step));
        }
        if floor > initial {
            return Err(ConfigError::FloorAboveInitial {
                initial: initial_quality,
                floor: floor_quality,
            });
        }

        Ok(Self {
            initial,
            step: step_level,
            floor,
        })
    }

    pub fn initial_quality(&self) -> QualityLevel {
        self.initial
    }

    pub fn step(&self) -> QualityLevel {
        self.step
    }

    pub fn floor_quality(&self) -> QualityLevel {
        self.floor
    }

    /// Upper bound on encode attempts: `ceil((initial - floor) / step) + 1`.
    ///
    /// Nine for the default schedule. When `step` divides the range this equals
    /// `floor((initial - floor) / step) + 1`. Otherwise it is one more: the
    /// floor gets its own attempt after a final decrement shorter than `step`,
    /// where a strict every-gap-equals-step walk would stop above the floor.
    pub fn max_attempts(&self) -> usize {
        let range = usize::from(self.initial.hundredths() - self.floor.hundredths());
        range.div_ceil(usize::from(self.step.hundredths())) + 1
    }

    /// The qualities the search will try, highest first.
    ///
    /// Each entry is `step` below the previous one. If `step` does not divide
    /// the range evenly, the last entry is clamped up to the floor so the
    /// floor is always the final candidate.
    pub fn qualities(&self) -> Qualities {
        Qualities {
            next: Some(self.initial.hundredths()),
            step: self.step.hundredths(),
            floor: self.floor.hundredths(),
        }
    }
}

fn parse_quality(field: &'static str, value: f32) -> Result<QualityLevel, ConfigError> {
    QualityLevel::new(value).ok_or(ConfigError::QualityOutOfRange { field, value })
}

/// Iterator over a [`CompressConfig`]'s quality schedule.
#[derive(Debug, Clone)]
pub struct Qualities {
    next: Option<u8>,
    step: u8,
    floor: u8,
}

impl Iterator for Qualities {
    type Item = QualityLevel;

    fn next(&mut self) -> Option<QualityLevel> {
        let current = self.next?;
        self.next = (current > self.floor).then(|| current.saturating_sub(self.step).max(self.floor));
        QualityLevel::from_hundredths(current)
    }
}
