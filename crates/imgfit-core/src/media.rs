//! Accepted input media types and the fixed output type.

use crate::decode::DecodeError;

/// Image media types understood by the pipeline.
///
/// JPEG and PNG are accepted as input. Output is always JPEG, whatever the
/// input type was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Jpeg,
    Png,
}

impl MediaType {
    /// MIME strings accepted by [`MediaType::from_mime`].
    pub const ACCEPTED_MIME_TYPES: [&'static str; 3] = ["image/jpeg", "image/jpg", "image/png"];

    /// Parse a MIME type string as reported by a file picker.
    ///
    /// Matching ignores ASCII case and surrounding whitespace. `image/jpg` is
    /// a common non-standard alias and is accepted as JPEG.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::UnsupportedMediaType` for anything other than
    /// JPEG or PNG.
    pub fn from_mime(mime: &str) -> Result<Self, DecodeError> {
        let normalized = mime.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "image/jpeg" | "image/jpg" => Ok(MediaType::Jpeg),
            "image/png" => Ok(MediaType::Png),
            _ => Err(DecodeError::UnsupportedMediaType(mime.trim().to_string())),
        }
    }

    /// Canonical MIME string.
    pub fn mime(self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
        }
    }

    /// File extension (without the dot) used when naming output files.
    pub fn extension(self) -> &'static str {
        match self {
            MediaType::Jpeg => "jpg",
            MediaType::Png => "png",
        }
    }

    /// Value for a file input's `accept` attribute.
    pub fn accept_attribute() -> String {
        Self::ACCEPTED_MIME_TYPES.join(",")
    }
}
