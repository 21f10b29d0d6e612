use crate::codec::encoded::EncodedImage;

/// Transport ceiling for any encoded image attached to a generation request (7 MiB).
///
/// The upstream API fails silently above this, so it is enforced before sending.
pub const MAX_ENCODED_BYTES: u64 = 7 * 1024 * 1024;

/// Typical lossless WebP output size relative to raw pixels, in percent.
const WEBP_COMPRESSION_PERCENT: u64 = 55;

/// Outcome of [`validate_mask_size`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeReport {
    pub valid: bool,
    pub size_kb: u64,
}

fn payload_or_whole(data_url: &str) -> &str {
    match data_url.split_once(',') {
        Some((_, p)) if !p.is_empty() => p,
        _ => data_url,
    }
}

/// Approximate decoded size (`base64_len * 3 / 4`, floored).
///
/// Uses the text after the first comma, or the whole string when there is none.
pub fn estimated_decoded_size(data_url: &str) -> u64 {
    payload_or_whole(data_url).len() as u64 * 3 / 4
}

pub fn exceeds_limit_str(data_url: &str) -> bool {
    // Compare `len * 3 / 4 > MAX` without losing the fractional part.
    payload_or_whole(data_url).len() as u64 * 3 > MAX_ENCODED_BYTES * 4
}

pub fn exceeds_limit(image: &EncodedImage) -> bool {
    exceeds_limit_str(image.as_str())
}

/// Size check used by the sketch mask path: valid strictly below 7 MiB, size rounded to KiB.
pub fn validate_mask_size(image: &EncodedImage) -> SizeReport {
    let bytes = image.payload().len() as f64 * 3.0 / 4.0;
    let kb = bytes / 1024.0;
    SizeReport {
        valid: kb / 1024.0 < 7.0,
        size_kb: kb.round() as u64,
    }
}

/// Rough lossless WebP size estimate for a `width x height` canvas.
pub fn estimate_webp_size(width: u32, height: u32, has_alpha: bool) -> u64 {
    let bytes_per_pixel = if has_alpha { 4 } else { 3 };
    let uncompressed = u64::from(width) * u64::from(height) * bytes_per_pixel;
    (uncompressed * WEBP_COMPRESSION_PERCENT).div_ceil(100)
}

#[cfg(test)]
#[path = "../../tests/unit/codec/limits.rs"]
mod tests;
