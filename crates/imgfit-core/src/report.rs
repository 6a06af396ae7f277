//! Display helpers for the result screen: sizes, savings, download names.

use crate::media::MediaType;

const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];

/// Format a byte count using 1024-based units.
///
/// The value is rounded to two decimals and printed without trailing zeros,
/// so `1536` is `"1.5 KB"` and `2097152` is `"2 MB"`. Sizes of a gigabyte or
/// more stay in MB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exponent = (bytes.ilog(1024) as usize).min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exponent])
}

/// Percentage saved by compression, `round((1 - compressed / original) * 100)`.
///
/// Negative when the output grew. `None` when `original` is zero. Halves
/// round towards positive infinity.
pub fn reduction_percent(original: u64, compressed: u64) -> Option<i64> {
    if original == 0 {
        return None;
    }
    let ratio = 1.0 - compressed as f64 / original as f64;
    Some((ratio * 100.0 + 0.5).floor() as i64)
}

/// Name for the downloaded file: `compressed_<base>.<ext>`.
///
/// The last extension of `original` is dropped when it is non-empty and holds
/// no `/`; `output` supplies the new one.
pub fn compressed_file_name(original: &str, output: MediaType) -> String {
    format!("compressed_{}.{}", strip_extension(original), output.extension())
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() && !name[dot + 1..].contains('/') => &name[..dot],
        _ => name,
    }
}
