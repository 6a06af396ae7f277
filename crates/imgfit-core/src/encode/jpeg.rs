//! JPEG encoding backend.
//!
//! Uses the `image` crate's JPEG encoder. Output is always JPEG regardless of
//! the input's original format, so a PNG upload comes back as a `.jpg`.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use super::{EncodedResult, QualityEncoder};
use crate::decode::SourceImage;
use crate::media::MediaType;
use crate::quality::QualityLevel;

/// Errors that can occur during encoding.
///
/// Any of these aborts a compression run; the compressor never retries.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The backend failed to produce output
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100); out-of-range values are clamped
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// [`QualityEncoder`] producing baseline JPEG.
///
/// Quality `q` maps to JPEG quality `round(q * 100)`, the same scale browsers
/// use for `canvas.toBlob(.., "image/jpeg", q)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JpegQualityEncoder;

impl QualityEncoder for JpegQualityEncoder {
    fn encode_at(
        &self,
        source: &SourceImage,
        quality: QualityLevel,
    ) -> Result<EncodedResult, EncodeError> {
        let bytes = encode_jpeg(
            &source.pixels,
            source.width,
            source.height,
            quality.as_jpeg_quality(),
        )?;
        Ok(EncodedResult::new(bytes, quality, MediaType::Jpeg))
    }

    fn media_type(&self) -> MediaType {
        MediaType::Jpeg
    }
}
