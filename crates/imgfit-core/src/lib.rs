//! imgfit Core - size-constrained image re-encoding
//!
//! Takes a JPEG or PNG upload and re-encodes it as JPEG at the highest quality
//! whose output fits a byte budget (2 MiB by default).
//!
//! # Module Structure
//!
//! - `decode` - media type validation and JPEG/PNG decoding
//! - `encode` - the encode-at-quality adapter over the JPEG encoder
//! - `compress` - the descending quality search
//! - `report` - size formatting, savings and download naming
//!
//! [`compress_file`] wires the three stages together for the common case.

pub mod compress;
pub mod decode;
pub mod encode;
pub mod media;
pub mod quality;
pub mod report;

pub use compress::{compress, Budget, CompressConfig, CompressionOutcome, ConfigError};
pub use decode::{decode_image, DecodeError, SourceImage};
pub use encode::{EncodeError, EncodedResult, JpegQualityEncoder, QualityEncoder};
pub use media::MediaType;
pub use quality::QualityLevel;
pub use report::{compressed_file_name, format_file_size, reduction_percent};

use log::debug;
use thiserror::Error;

/// Errors from the end-to-end [`compress_file`] pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl PipelineError {
    /// Message suitable for showing to the person who uploaded the file.
    ///
    /// Unsupported uploads get a specific hint; every other failure maps to a
    /// single generic retry message.
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::Decode(DecodeError::UnsupportedMediaType(_)) => {
                "Please upload a JPEG, JPG, or PNG image"
            }
            _ => "Failed to compress image. Please try again.",
        }
    }
}

/// Result of compressing one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionReport {
    /// Size of the uploaded file in bytes.
    pub original_size: u64,
    /// The encoding handed back to the caller.
    pub result: EncodedResult,
    /// Number of encode attempts the search made.
    pub attempts: usize,
    /// False when the floor-quality result is still over budget.
    pub within_budget: bool,
}

impl CompressionReport {
    /// Percentage saved relative to the upload. See [`reduction_percent`].
    pub fn reduction_percent(&self) -> Option<i64> {
        reduction_percent(self.original_size, self.result.size() as u64)
    }

    /// Download name derived from the uploaded file's name.
    pub fn download_name(&self, original_name: &str) -> String {
        compressed_file_name(original_name, self.result.media_type())
    }
}

/// Validate, decode and compress an uploaded file.
///
/// `mime` is the media type reported for the upload and must be JPEG or PNG.
/// The decoded pixels are dropped once the search finishes.
///
/// # Errors
///
/// Returns `PipelineError::Decode` for rejected or unreadable uploads and
/// `PipelineError::Encode` if any encode attempt fails.
pub fn compress_file(
    bytes: &[u8],
    mime: &str,
    budget: Budget,
    config: &CompressConfig,
) -> Result<CompressionReport, PipelineError> {
    let media_type = MediaType::from_mime(mime)?;
    let source = decode_image(bytes)?;
    debug!(
        "decoded {} upload: {}x{}, {} bytes",
        media_type.mime(),
        source.width,
        source.height,
        bytes.len()
    );

    let outcome = compress::compress_detailed(&JpegQualityEncoder, &source, budget, config)?;
    drop(source);

    Ok(CompressionReport {
        original_size: bytes.len() as u64,
        result: outcome.result,
        attempts: outcome.attempts,
        within_budget: outcome.within_budget,
    })
}
