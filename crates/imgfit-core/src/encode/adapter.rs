//! The encode-at-quality contract the compressor searches over.

use super::EncodeError;
use crate::decode::SourceImage;
use crate::media::MediaType;
use crate::quality::QualityLevel;

/// Output of a single encode attempt.
///
/// Owns its byte buffer; dropping the result releases it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedResult {
    bytes: Vec<u8>,
    quality: QualityLevel,
    media_type: MediaType,
}

impl EncodedResult {
    pub fn new(bytes: Vec<u8>, quality: QualityLevel, media_type: MediaType) -> Self {
        Self {
            bytes,
            quality,
            media_type,
        }
    }

    /// Exact encoded size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn quality(&self) -> QualityLevel {
        self.quality
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take ownership of the encoded buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// An image encoder with a single quality knob.
///
/// Each call is exactly one encode attempt: implementations must not retry
/// internally and must not modify `source`. For a fixed encoder, the same
/// `(source, quality)` pair yields the same bytes.
pub trait QualityEncoder {
    /// Encode `source` at `quality`.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] when the backend cannot produce output.
    fn encode_at(
        &self,
        source: &SourceImage,
        quality: QualityLevel,
    ) -> Result<EncodedResult, EncodeError>;

    /// Media type of everything this encoder produces.
    fn media_type(&self) -> MediaType;
}

impl<E: QualityEncoder + ?Sized> QualityEncoder for &E {
    fn encode_at(
        &self,
        source: &SourceImage,
        quality: QualityLevel,
    ) -> Result<EncodedResult, EncodeError> {
        (**self).encode_at(source, quality)
    }

    fn media_type(&self) -> MediaType {
        (**self).media_type()
    }
}
