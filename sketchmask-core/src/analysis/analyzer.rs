use crate::{
    analysis::{
        feather::create_feathered_mask,
        guidance::{ColorGuidance, extract_color_guidance},
        options::SketchOptions,
        structure::{StructuralMap, extract_structural_map},
    },
    codec::encoded::{EncodedImage, encode_lossless},
    foundation::{core::PixelBuffer, error::SketchResult},
};

/// Multimodal control signals derived from one sketch snapshot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchAnalysis {
    /// White image whose alpha channel carries the feathered edit region.
    pub binary_mask: EncodedImage,
    pub structural_map: StructuralMap,
    pub color_map: Vec<ColorGuidance>,
    pub feather_amount: f64,
}

/// The headline figures of an analysis, as reported alongside requests.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchSummary {
    pub structural_segments: usize,
    pub color_regions: usize,
    pub confidence: f32,
}

impl SketchAnalysis {
    pub fn summary(&self) -> SketchSummary {
        SketchSummary {
            structural_segments: self.structural_map.line_geometry.len(),
            color_regions: self.color_map.len(),
            confidence: self.structural_map.confidence_score,
        }
    }

    /// Whether any traced stroke survived noise filtering.
    pub fn has_strokes(&self) -> bool {
        !self.structural_map.line_geometry.is_empty()
    }
}

/// Analyze a sketch layer into mask, structure and color channels.
///
/// The three channels are computed in parallel from the same borrowed snapshot; the buffer is
/// never mutated or retained.
#[tracing::instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn analyze_sketch(
    buffer: &PixelBuffer,
    options: &SketchOptions,
) -> SketchResult<SketchAnalysis> {
    options.validate()?;

    let (structural_map, (color_map, mask)) = rayon::join(
        || extract_structural_map(buffer, options.structure_weight),
        || {
            rayon::join(
                || extract_color_guidance(buffer, options.color_weight),
                || create_feathered_mask(buffer, options.feather_amount),
            )
        },
    );
    let binary_mask = encode_lossless(&mask?)?;

    let analysis = SketchAnalysis {
        binary_mask,
        structural_map,
        color_map,
        feather_amount: options.feather_amount,
    };
    let summary = analysis.summary();
    tracing::debug!(
        segments = summary.structural_segments,
        regions = summary.color_regions,
        confidence = summary.confidence,
        "sketch analyzed"
    );
    Ok(analysis)
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/analyzer.rs"]
mod tests;
