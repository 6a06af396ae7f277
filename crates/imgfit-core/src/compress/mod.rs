//! Adaptive Compressor: finds the highest quality whose encoding fits a byte
//! budget.
//!
//! # Search policy
//!
//! A linear descending search over a [`CompressConfig`] schedule (0.9, 0.8,
//! ..., 0.1 by default). Quality-to-size is not guaranteed monotonic for
//! arbitrary images, so each candidate is tried in order rather than bisected.
//! The number of attempts is bounded by [`CompressConfig::max_attempts`].
//!
//! The floor attempt is returned even when it is still over budget. Callers
//! that need to know should check [`CompressionOutcome::within_budget`] or
//! compare sizes themselves.
//!
//! # Examples
//!
//! ```ignore
//! use imgfit_core::compress::{compress, Budget, CompressConfig};
//! use imgfit_core::encode::JpegQualityEncoder;
//!
//! let result = compress(&JpegQualityEncoder, &source, Budget::DEFAULT, &CompressConfig::default())?;
//! println!("{} bytes at quality {}", result.size(), result.quality());
//! ```

mod config;
mod search;

pub use config::{Budget, CompressConfig, ConfigError, Qualities};
pub use search::{
    compress, compress_detailed, compress_with_cancel, CancelFlag, CompressError,
    CompressionOutcome,
};
