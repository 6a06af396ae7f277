//! Result-screen helper bindings.
//!
//! Sizes cross the boundary as `f64` because JavaScript file sizes are plain
//! numbers; negative or fractional values are truncated towards zero.

use imgfit_core::{report, MediaType};
use wasm_bindgen::prelude::*;

fn to_bytes(value: f64) -> u64 {
    // `as` saturates: NaN and negatives become 0.
    value as u64
}

/// Format a byte count for display, e.g. `"1.5 KB"`.
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    report::format_file_size(to_bytes(bytes))
}

/// Whole-percent saving of `compressed_size` against `original_size`.
///
/// Returns `undefined` when the original size is zero.
#[wasm_bindgen]
pub fn reduction_percent(original_size: f64, compressed_size: f64) -> Option<i32> {
    report::reduction_percent(to_bytes(original_size), to_bytes(compressed_size))
        .map(|percent| percent.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

/// Download name for a compressed upload, e.g. `photo.png` -> `compressed_photo.jpg`.
#[wasm_bindgen]
pub fn compressed_file_name(original_name: &str) -> String {
    report::compressed_file_name(original_name, MediaType::Jpeg)
}

/// Whether a file picker's MIME type is accepted for upload.
///
/// ```typescript
/// if (!is_supported_media_type(file.type)) {
///   showError('Please upload a JPEG, JPG, or PNG image');
/// }
/// ```
#[wasm_bindgen]
pub fn is_supported_media_type(mime: &str) -> bool {
    MediaType::from_mime(mime).is_ok()
}

/// Value for the upload input's `accept` attribute.
#[wasm_bindgen]
pub fn accepted_mime_types() -> String {
    MediaType::accept_attribute()
}
