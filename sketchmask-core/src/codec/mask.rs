use crate::{
    codec::encoded::{EncodedImage, encode_lossless},
    foundation::{
        core::{PixelBuffer, alloc_scratch},
        error::SketchResult,
    },
};

/// Search window (in pixels, each direction) for selection-mask edge distances.
///
/// Deliberately narrower than [`crate::SKETCH_FEATHER_WINDOW`]; the two mask paths are tuned
/// separately.
pub const SELECTION_FEATHER_WINDOW: i32 = 5;

/// `ceil(max(width, height) * feather_amount)`.
pub fn selection_feather_radius(width: u32, height: u32, feather_amount: f64) -> u32 {
    let r = (f64::from(width.max(height)) * feather_amount).ceil();
    if r.is_finite() && r > 0.0 { r as u32 } else { 0 }
}

/// Selected pixel indices become opaque white, everything else transparent black.
///
/// With `feather_amount > 0`, opaque boundary pixels (any 8-neighbor with a different alpha)
/// are faded by `min(distance / radius, 1)`. Indices outside the canvas are ignored.
pub fn build_binary_mask(
    width: u32,
    height: u32,
    selected: impl IntoIterator<Item = usize>,
    feather_amount: f64,
) -> SketchResult<PixelBuffer> {
    let mut data = alloc_scratch(width, height)?;
    let len = data.len() / 4;

    let mut ignored = 0usize;
    for idx in selected {
        if idx >= len {
            ignored += 1;
            continue;
        }
        data[idx * 4..idx * 4 + 4].copy_from_slice(&[255, 255, 255, 255]);
    }
    if ignored > 0 {
        tracing::warn!(ignored, width, height, "selection indices outside the canvas");
    }

    if feather_amount > 0.0 {
        let radius = selection_feather_radius(width, height, feather_amount);
        if radius > 0 {
            feather_boundary(&mut data, width, height, f64::from(radius));
        }
    }

    PixelBuffer::new(width, height, data)
}

#[tracing::instrument(skip(selected))]
pub fn create_binary_mask(
    width: u32,
    height: u32,
    selected: impl IntoIterator<Item = usize>,
    feather_amount: f64,
) -> SketchResult<EncodedImage> {
    let mask = build_binary_mask(width, height, selected, feather_amount)?;
    encode_lossless(&mask)
}

fn feather_boundary(data: &mut [u8], width: u32, height: u32, radius: f64) {
    let (w, h) = (width as usize, height as usize);
    let snapshot: Vec<u8> = data.chunks_exact(4).map(|px| px[3]).collect();

    for y in 0..h {
        for x in 0..w {
            if snapshot[y * w + x] != 255 || !is_boundary(&snapshot, x, y, w, h) {
                continue;
            }
            let factor = match distance_to_clear(&snapshot, x, y, w, h) {
                Some(d) => (d / radius).min(1.0),
                None => 1.0,
            };
            data[(y * w + x) * 4 + 3] = (255.0 * factor).floor() as u8;
        }
    }
}

/// Inclusive `[c - reach, c + reach]` clipped to `0..len`.
fn span(c: usize, reach: usize, len: usize) -> std::ops::Range<usize> {
    c.saturating_sub(reach)..(c + reach + 1).min(len)
}

fn is_boundary(alpha: &[u8], x: usize, y: usize, w: usize, h: usize) -> bool {
    let own = alpha[y * w + x];
    span(y, 1, h).any(|ny| span(x, 1, w).any(|nx| alpha[ny * w + nx] != own))
}

fn distance_to_clear(alpha: &[u8], x: usize, y: usize, w: usize, h: usize) -> Option<f64> {
    let reach = SELECTION_FEATHER_WINDOW as usize;
    let mut best: Option<usize> = None;
    for ny in span(y, reach, h) {
        for nx in span(x, reach, w) {
            if alpha[ny * w + nx] == 0 {
                let d2 = ny.abs_diff(y).pow(2) + nx.abs_diff(x).pow(2);
                best = Some(best.map_or(d2, |b| b.min(d2)));
            }
        }
    }
    best.map(|d2| (d2 as f64).sqrt())
}

#[cfg(test)]
#[path = "../../tests/unit/codec/mask.rs"]
mod tests;
