use crate::foundation::{
    core::{PixelBuffer, STRONG_ALPHA, alloc_scratch},
    error::SketchResult,
};

/// Search window (in pixels, each direction) for the sketch-mask distance transform.
///
/// Strong pixels with no transparent pixel inside the window keep the "far" distance (the canvas
/// diagonal). The search is `O(pixels * 41 * 41)` at worst.
pub const SKETCH_FEATHER_WINDOW: i32 = 20;

/// `max(1, floor(min(width, height) * feather_amount))`.
pub fn sketch_feather_radius(width: u32, height: u32, feather_amount: f64) -> u32 {
    let r = (f64::from(width.min(height)) * feather_amount).floor();
    if r.is_finite() && r >= 1.0 {
        r as u32
    } else {
        1
    }
}

/// Per-pixel Euclidean distance from each strong pixel to the nearest pixel with alpha < 128.
///
/// Pixels that are not strong get distance `0`.
pub fn distance_to_transparent(buffer: &PixelBuffer) -> Vec<f32> {
    let (width, height) = (buffer.width() as usize, buffer.height() as usize);
    let far = (f64::from(buffer.width()).powi(2) + f64::from(buffer.height()).powi(2)).sqrt() as f32;
    let alpha = buffer.alpha_plane();
    let mut out = vec![0.0f32; alpha.len()];
    let window = SKETCH_FEATHER_WINDOW as usize;

    for y in 0..height {
        for x in 0..width {
            if alpha[y * width + x] <= STRONG_ALPHA {
                continue;
            }
            let mut best_sq = usize::MAX;
            for ny in y.saturating_sub(window)..(y + window + 1).min(height) {
                for nx in x.saturating_sub(window)..(x + window + 1).min(width) {
                    if alpha[ny * width + nx] < STRONG_ALPHA {
                        best_sq = best_sq.min(ny.abs_diff(y).pow(2) + nx.abs_diff(x).pow(2));
                    }
                }
            }
            out[y * width + x] = if best_sq == usize::MAX {
                far
            } else {
                (best_sq as f32).sqrt().min(far)
            };
        }
    }
    out
}

/// Build the white, alpha-only feathered mask for a sketch.
///
/// Inside the feather band alpha is scaled by `distance / radius` (floored); elsewhere the
/// source alpha is kept. The caller's buffer is never touched.
pub fn create_feathered_mask(
    buffer: &PixelBuffer,
    feather_amount: f64,
) -> SketchResult<PixelBuffer> {
    let (w, h) = (buffer.width(), buffer.height());
    let radius = f64::from(sketch_feather_radius(w, h, feather_amount));
    let distances = distance_to_transparent(buffer);

    let mut scratch = alloc_scratch(w, h)?;
    for ((dst, src), &d) in scratch
        .chunks_exact_mut(4)
        .zip(buffer.as_bytes().chunks_exact(4))
        .zip(&distances)
    {
        let alpha = src[3];
        let d = f64::from(d);
        let feathered = if d < radius && alpha > 0 {
            (f64::from(alpha) * (d / radius)).floor() as u8
        } else {
            alpha
        };
        dst.copy_from_slice(&[255, 255, 255, feathered]);
    }

    tracing::debug!(width = w, height = h, radius, "feathered sketch mask");
    PixelBuffer::new(w, h, scratch)
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/feather.rs"]
mod tests;
