use serde::ser::SerializeSeq;

use crate::foundation::{
    core::{PixelBuffer, Point, STRONG_ALPHA},
    error::{SketchError, SketchResult},
};

/// Upper bound on pixels claimed by a single traced segment.
///
/// A large contiguous stroke is split into several segments once the cap is hit; this keeps
/// each trace bounded on interactive redraws.
pub const SEGMENT_VISIT_CAP: usize = 1000;

/// Segments with fewer points are treated as noise and dropped.
pub const MIN_SEGMENT_POINTS: usize = 3;

const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// One traced connected component of strong stroke pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LineSegment {
    pub points: Vec<Point>,
    /// Mean `alpha / 255` over the segment's points.
    pub thickness: f32,
    /// `min(1, points / 10)`.
    pub confidence: f32,
}

/// Dense per-pixel stroke density (`alpha / 255`), serialized as `float[height][width]`.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityMap {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl DensityMap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Density at `(x, y)`, `None` outside the map.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks_exact(self.width.max(1) as usize)
    }

    pub fn total(&self) -> f32 {
        self.values.iter().sum()
    }
}

impl serde::Serialize for DensityMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.height as usize))?;
        for row in self.rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

impl<'de> serde::Deserialize<'de> for DensityMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<Vec<f32>>::deserialize(deserializer)?;
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != width) {
            return Err(serde::de::Error::custom("density map rows must share one width"));
        }
        let height = rows.len();
        Ok(Self {
            width: width as u32,
            height: height as u32,
            values: rows.into_iter().flatten().collect(),
        })
    }
}

/// Structural control channel derived from the sketch's line geometry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralMap {
    pub line_geometry: Vec<LineSegment>,
    pub density_map: DensityMap,
    /// Coverage heuristic in `[0, 1]`.
    pub confidence_score: f32,
}

impl StructuralMap {
    pub fn traced_points(&self) -> usize {
        self.line_geometry.iter().map(|s| s.points.len()).sum()
    }
}

pub fn extract_structural_map(buffer: &PixelBuffer, structure_weight: f64) -> StructuralMap {
    let (w, h) = (buffer.width(), buffer.height());
    let density = DensityMap {
        width: w,
        height: h,
        values: buffer
            .as_bytes()
            .chunks_exact(4)
            .map(|px| f32::from(px[3]) / 255.0)
            .collect(),
    };

    let mut visited = vec![false; buffer.pixel_count()];
    let mut line_geometry = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let idx = y as usize * w as usize + x as usize;
            if visited[idx] || buffer.alpha(x, y) <= STRONG_ALPHA {
                continue;
            }
            let segment = flood_segment(buffer, x, y, &mut visited);
            if segment.points.len() >= MIN_SEGMENT_POINTS {
                line_geometry.push(segment);
            }
        }
    }

    let stroke_pixels: usize = line_geometry.iter().map(|s| s.points.len()).sum();
    let confidence_score =
        coverage_score(stroke_pixels, buffer.pixel_count(), 10.0, structure_weight);

    tracing::debug!(
        segments = line_geometry.len(),
        stroke_pixels,
        confidence_score,
        "structural map extracted"
    );

    StructuralMap {
        line_geometry,
        density_map: density,
        confidence_score,
    }
}

/// Iterative 8-connected flood fill from `(x, y)`, capped at [`SEGMENT_VISIT_CAP`] points.
///
/// `visited` is the row-major claim mask shared across traces and must hold one flag per pixel.
/// Pixels are marked visited when popped, whether or not they are strong, so no pixel is ever
/// claimed by two segments.
pub fn trace_line_segment(
    buffer: &PixelBuffer,
    start_x: u32,
    start_y: u32,
    visited: &mut [bool],
) -> SketchResult<LineSegment> {
    if visited.len() != buffer.pixel_count() {
        return Err(SketchError::validation(format!(
            "visited mask has {} flags, expected {} for {}x{}",
            visited.len(),
            buffer.pixel_count(),
            buffer.width(),
            buffer.height()
        )));
    }
    if !buffer.in_bounds(start_x, start_y) {
        return Err(SketchError::validation(format!(
            "trace start ({start_x}, {start_y}) is outside {}x{}",
            buffer.width(),
            buffer.height()
        )));
    }
    Ok(flood_segment(buffer, start_x, start_y, visited))
}

fn flood_segment(
    buffer: &PixelBuffer,
    start_x: u32,
    start_y: u32,
    visited: &mut [bool],
) -> LineSegment {
    let (w, h) = (buffer.width(), buffer.height());
    let mut points = Vec::new();
    let mut stack = vec![(start_x, start_y)];
    let mut alpha_sum = 0.0f32;

    while points.len() < SEGMENT_VISIT_CAP {
        let Some((x, y)) = stack.pop() else {
            break;
        };
        let idx = y as usize * w as usize + x as usize;
        if visited[idx] {
            continue;
        }
        visited[idx] = true;

        let alpha = buffer.alpha(x, y);
        if alpha <= STRONG_ALPHA {
            continue;
        }
        points.push(Point { x, y });
        alpha_sum += f32::from(alpha) / 255.0;

        for (dx, dy) in NEIGHBORS_8 {
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                continue;
            };
            if nx < w && ny < h {
                stack.push((nx, ny));
            }
        }
    }

    let count = points.len();
    LineSegment {
        points,
        thickness: if count > 0 {
            alpha_sum / count as f32
        } else {
            0.5
        },
        confidence: (count as f32 / 10.0).min(1.0),
    }
}

/// `min(1, part / total * scale * weight)`, the shared saturation heuristic.
pub(crate) fn coverage_score(part: usize, total: usize, scale: f64, weight: f64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    ((part as f64 / total as f64) * scale * weight).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/structure.rs"]
mod tests;
