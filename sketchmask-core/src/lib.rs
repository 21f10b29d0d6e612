//! Sketchmask turns freehand sketch layers into control signals for image edit requests.
//!
//! A sketch is an RGBA snapshot ([`PixelBuffer`]) where opaque strokes mark what the user drew.
//! [`analyze_sketch`] derives three channels from it:
//!
//! 1. **Structure**: stroke segments traced by flood fill ([`StructuralMap`])
//! 2. **Color**: dominant quantized colors with their bounding regions ([`ColorGuidance`])
//! 3. **Mask**: a white, edge-feathered alpha mask encoded as a lossless data URL
//!
//! Independently of sketches, [`create_binary_mask`] builds an edit mask from a set of selected
//! pixel indices, and the [`EncodedImage`] helpers measure encoded payloads against the
//! transport ceiling ([`MAX_ENCODED_BYTES`]) before a [`GenerationRequest`] is sent.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Read-only inputs**: analysis borrows its snapshot and never mutates or retains it.
//! - **Deterministic**: identical inputs produce identical channels and identical encodings.
#![forbid(unsafe_code)]

mod analysis;
mod codec;
mod foundation;
mod request;

pub use analysis::analyzer::{SketchAnalysis, SketchSummary, analyze_sketch};
pub use analysis::feather::{
    SKETCH_FEATHER_WINDOW, create_feathered_mask, distance_to_transparent, sketch_feather_radius,
};
pub use analysis::guidance::{
    ColorGuidance, MIN_REGION_PIXELS, QUANT_STEP, extract_color_guidance, quantize,
};
pub use analysis::options::SketchOptions;
pub use analysis::structure::{
    DensityMap, LineSegment, MIN_SEGMENT_POINTS, SEGMENT_VISIT_CAP, StructuralMap,
    extract_structural_map, trace_line_segment,
};
pub use codec::encoded::{EncodedImage, LosslessFormat, encode_lossless, encode_lossless_as};
pub use codec::limits::{
    MAX_ENCODED_BYTES, SizeReport, estimate_webp_size, estimated_decoded_size, exceeds_limit,
    exceeds_limit_str, validate_mask_size,
};
pub use codec::mask::{
    SELECTION_FEATHER_WINDOW, build_binary_mask, create_binary_mask, selection_feather_radius,
};
pub use foundation::color::{Hsl, rgb_to_hsl};
pub use foundation::core::{PixelBuffer, Point, Region, STRONG_ALPHA};
pub use foundation::error::{SketchError, SketchResult};
pub use request::model::{AspectRatio, GenerationMode, GenerationRequest, ensure_within_limit};
pub use request::preflight::prepare_edit;
