use crate::{
    analysis::options::SketchOptions,
    codec::{encoded::encode_lossless, mask::build_binary_mask},
    foundation::{
        core::PixelBuffer,
        error::{SketchError, SketchResult},
    },
    request::model::{GenerationRequest, ensure_within_limit},
};

/// Assemble an edit request from a base image and a pixel selection over it.
///
/// Steps run in the order a caller would see failures: prompt, base image size, selection,
/// mask size. A selection is empty when none of its indices fall on the canvas; feathering never
/// turns a non-empty selection into an empty one. Nothing is sent; the returned request has
/// already passed [`GenerationRequest::validate`].
#[tracing::instrument(skip(base, selected), fields(width = base.width(), height = base.height()))]
pub fn prepare_edit(
    prompt: &str,
    base: &PixelBuffer,
    selected: impl IntoIterator<Item = usize>,
    options: &SketchOptions,
) -> SketchResult<GenerationRequest> {
    if prompt.trim().is_empty() {
        return Err(SketchError::validation("prompt is required"));
    }
    options.validate()?;

    let base_image = encode_lossless(base)?;
    ensure_within_limit("base image", &base_image)?;

    let pixel_count = base.pixel_count();
    let selected: Vec<usize> = selected.into_iter().filter(|&i| i < pixel_count).collect();
    if selected.is_empty() {
        return Err(SketchError::empty_selection("select an area to edit"));
    }
    let selected_count = selected.len();
    let mask = build_binary_mask(
        base.width(),
        base.height(),
        selected,
        options.feather_amount,
    )?;
    let mask_image = encode_lossless(&mask)?;
    ensure_within_limit("mask", &mask_image)?;

    let request = GenerationRequest::edit(prompt, base_image, mask_image).with_weights(
        options.structure_weight,
        options.color_weight,
        options.feather_amount,
    );
    request.validate()?;
    tracing::debug!(selected = selected_count, "edit request prepared");
    Ok(request)
}

#[cfg(test)]
#[path = "../../tests/unit/request/preflight.rs"]
mod tests;
