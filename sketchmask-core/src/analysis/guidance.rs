use crate::{
    analysis::structure::coverage_score,
    foundation::{
        color::Hsl,
        core::{PixelBuffer, Region, STRONG_ALPHA},
    },
};

/// Channel step used to bucket sketch colors (8 buckets per channel).
pub const QUANT_STEP: u8 = 32;

/// Buckets with fewer contributing pixels are dropped.
pub const MIN_REGION_PIXELS: usize = 10;

const BUCKETS_PER_CHANNEL: usize = 256 / QUANT_STEP as usize;

/// Color control channel entry for one quantized sketch color.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorGuidance {
    /// CSS `hsl(...)` of the bucket's representative color.
    pub color: String,
    pub region: Region,
    /// Influence in `[0, 1]`.
    pub weight: f32,
}

#[derive(Debug)]
struct BucketAcc {
    // First-seen pixel color stands in for the whole bucket.
    representative: [u8; 3],
    count: usize,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl BucketAcc {
    fn new(rgb: [u8; 3], x: u32, y: u32) -> Self {
        Self {
            representative: rgb,
            count: 0,
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn add(&mut self, x: u32, y: u32) {
        self.count += 1;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

pub fn quantize(r: u8, g: u8, b: u8) -> usize {
    let q = |c: u8| (c / QUANT_STEP) as usize;
    (q(r) * BUCKETS_PER_CHANNEL + q(g)) * BUCKETS_PER_CHANNEL + q(b)
}

/// Group strong pixels into quantized color buckets and describe each surviving bucket.
///
/// Entries come out in first-seen bucket order of a row-major scan.
pub fn extract_color_guidance(buffer: &PixelBuffer, color_weight: f64) -> Vec<ColorGuidance> {
    let mut slots = [None::<usize>; BUCKETS_PER_CHANNEL.pow(3)];
    let mut buckets: Vec<BucketAcc> = Vec::new();

    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            let [r, g, b, a] = buffer.rgba(x, y);
            if a <= STRONG_ALPHA {
                continue;
            }
            let key = quantize(r, g, b);
            let slot = *slots[key].get_or_insert_with(|| {
                buckets.push(BucketAcc::new([r, g, b], x, y));
                buckets.len() - 1
            });
            buckets[slot].add(x, y);
        }
    }

    let area = buffer.pixel_count();
    let dropped = buckets
        .iter()
        .filter(|b| b.count < MIN_REGION_PIXELS)
        .count();
    let out: Vec<ColorGuidance> = buckets
        .into_iter()
        .filter(|b| b.count >= MIN_REGION_PIXELS)
        .map(|acc| {
            let [r, g, b] = acc.representative;
            ColorGuidance {
                color: Hsl::from_rgb(r, g, b).to_string(),
                region: Region::from_extents(acc.min_x, acc.min_y, acc.max_x, acc.max_y),
                weight: coverage_score(acc.count, area, 100.0, color_weight),
            }
        })
        .collect();

    tracing::debug!(regions = out.len(), dropped, "color guidance extracted");
    out
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/guidance.rs"]
mod tests;
