//! Encoder Adapter: one encode attempt at a given quality.
//!
//! [`QualityEncoder`] is the seam between the adaptive compressor and the
//! pixel codec. [`JpegQualityEncoder`] is the production implementation,
//! backed by the `image` crate's baseline JPEG encoder.
//!
//! # Examples
//!
//! ```ignore
//! use imgfit_core::encode::{JpegQualityEncoder, QualityEncoder};
//! use imgfit_core::{QualityLevel, SourceImage};
//!
//! let source = SourceImage::new(100, 100, vec![128u8; 100 * 100 * 3]);
//! let result = JpegQualityEncoder.encode_at(&source, QualityLevel::new(0.9).unwrap())?;
//! println!("Encoded {} bytes", result.size());
//! ```

mod adapter;
mod jpeg;

pub use adapter::{EncodedResult, QualityEncoder};
pub use jpeg::{encode_jpeg, EncodeError, JpegQualityEncoder};
