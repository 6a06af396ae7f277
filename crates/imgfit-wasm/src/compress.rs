//! Compression WASM bindings.
//!
//! # Functions
//!
//! - [`compress_image`] - Compress an uploaded JPEG/PNG to fit a byte budget
//! - [`default_config`] - The default quality schedule as a plain object
//!
//! # Example
//!
//! ```typescript
//! import { compress_image, compressed_file_name } from '@imgfit/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_image(bytes, file.type);
//! const blob = new Blob([result.bytes()], { type: result.mime_type });
//! link.download = compressed_file_name(file.name);
//! result.free();
//! ```

use imgfit_core::{compress_file, Budget, CompressConfig, CompressionReport, ConfigError};
use log::error;
use wasm_bindgen::prelude::*;

/// Handle to a finished compression.
///
/// The encoded bytes live in WASM memory until `free()` is called or the
/// finalizer runs. Call `free()` when the result is no longer shown, including
/// when the user starts over with a new upload.
#[wasm_bindgen]
pub struct JsCompressionResult {
    report: CompressionReport,
}

#[wasm_bindgen]
impl JsCompressionResult {
    /// Encoded size in bytes
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.report.result.size()
    }

    /// Size of the original upload in bytes
    #[wasm_bindgen(getter)]
    pub fn original_size(&self) -> f64 {
        self.report.original_size as f64
    }

    /// Quality the winning attempt was encoded at (0.0 - 1.0)
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.report.result.quality().as_f32()
    }

    /// Number of encode attempts made
    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> usize {
        self.report.attempts
    }

    /// False when even the lowest quality did not fit the budget
    #[wasm_bindgen(getter)]
    pub fn within_budget(&self) -> bool {
        self.report.within_budget
    }

    /// MIME type of the encoded bytes (always "image/jpeg")
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.report.result.media_type().mime().to_string()
    }

    /// Whole-percent saving compared to the upload
    #[wasm_bindgen(getter)]
    pub fn reduction_percent(&self) -> Option<i32> {
        self.report
            .reduction_percent()
            .map(|percent| percent.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
    }

    /// Returns the encoded bytes as Uint8Array.
    ///
    /// This copies the buffer into JavaScript memory.
    pub fn bytes(&self) -> Vec<u8> {
        self.report.result.bytes().to_vec()
    }

    /// Download name derived from the uploaded file's name
    pub fn download_name(&self, original_name: &str) -> String {
        self.report.download_name(original_name)
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the encoded buffer
    }
}

/// Compress an uploaded JPEG or PNG so it fits within `budget` bytes.
///
/// # Arguments
///
/// * `bytes` - The uploaded file's bytes
/// * `mime` - The upload's MIME type (`image/jpeg`, `image/jpg` or `image/png`)
/// * `budget` - Maximum output size in bytes (default: 2 MiB)
/// * `config` - Optional `{ initial_quality, step, floor_quality }` object;
///   missing fields use the defaults (0.9, 0.1, 0.1)
///
/// # Errors
///
/// Rejects with a user-facing message string. Unsupported types get
/// "Please upload a JPEG, JPG, or PNG image"; any other failure gets
/// "Failed to compress image. Please try again." and the detailed cause is
/// logged to the console.
///
/// A budget that cannot be met is not an error: the lowest-quality result is
/// returned with `within_budget === false`.
#[wasm_bindgen]
pub fn compress_image(
    bytes: &[u8],
    mime: &str,
    budget: Option<usize>,
    config: JsValue,
) -> Result<JsCompressionResult, JsValue> {
    let config = if config.is_undefined() || config.is_null() {
        None
    } else {
        let parsed: CompressConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid compression config: {e}")))?;
        Some(parsed)
    };

    run_compression(bytes, mime, budget, config).map_err(|e| JsValue::from_str(&e))
}

/// Default quality schedule as `{ initial_quality, step, floor_quality }`.
#[wasm_bindgen]
pub fn default_config() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&CompressConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Target-independent part of [`compress_image`]; errors are user-facing
/// message strings.
fn run_compression(
    bytes: &[u8],
    mime: &str,
    budget: Option<usize>,
    config: Option<CompressConfig>,
) -> Result<JsCompressionResult, String> {
    let budget = match budget {
        Some(bytes) => Budget::new(bytes).map_err(|e: ConfigError| e.to_string())?,
        None => Budget::DEFAULT,
    };
    let config = config.unwrap_or_default();

    compress_file(bytes, mime, budget, &config)
        .map(|report| JsCompressionResult { report })
        .map_err(|e| {
            error!("compression failed: {e}");
            e.user_message().to_string()
        })
}
