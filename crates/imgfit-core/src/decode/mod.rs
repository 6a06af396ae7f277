//! Upstream decode step: turns accepted input bytes into a [`SourceImage`].
//!
//! JPEG and PNG inputs are supported. Orientation stored in EXIF metadata is
//! applied during decoding, and the result is always RGB8.
//!
//! # Examples
//!
//! ```ignore
//! use imgfit_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.png").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::decode_image;
pub use types::{DecodeError, Orientation, SourceImage};
