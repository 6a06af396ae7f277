//! imgfit WASM - WebAssembly bindings for imgfit
//!
//! Exposes the imgfit-core compression pipeline to a browser shell.
//!
//! # Module Structure
//!
//! - `compress` - upload compression and the result handle
//! - `report` - size formatting, savings and download naming helpers
//! - `logger` - `log` backend writing to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image, format_file_size } from '@imgfit/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_image(bytes, file.type);
//! console.log(`${format_file_size(file.size)} -> ${format_file_size(result.size)}`);
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod logger;
mod report;

pub use compress::{compress_image, default_config, JsCompressionResult};
pub use report::{compressed_file_name, format_file_size, is_supported_media_type, reduction_percent};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Info);
}

/// Change console log verbosity ("error", "warn", "info", "debug", "trace", "off").
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    logger::install(logger::level_from_str(level));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
