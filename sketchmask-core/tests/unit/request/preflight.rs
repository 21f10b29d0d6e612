use super::*;
use crate::request::model::GenerationMode;

fn base() -> PixelBuffer {
    PixelBuffer::filled(16, 16, [40, 90, 160, 255]).unwrap()
}

fn square(x0: usize, x1: usize, width: usize) -> Vec<usize> {
    (x0..x1)
        .flat_map(|y| (x0..x1).map(move |x| y * width + x))
        .collect()
}

#[test]
fn prepared_edit_carries_both_images_and_weights() {
    let opts = SketchOptions::default();
    let req = prepare_edit("make it red", &base(), square(4, 12, 16), &opts).unwrap();
    assert_eq!(req.mode, GenerationMode::Edit);
    assert_eq!(req.structural_weight, opts.structure_weight);
    assert_eq!(req.color_weight, opts.color_weight);
    assert_eq!(req.feather_amount, opts.feather_amount);

    let base_img = req.base_image.as_ref().unwrap();
    assert_eq!(base_img.mime(), "image/webp");
    assert_eq!(base_img.decode_pixels().unwrap(), base());

    let mask = req.mask_image.as_ref().unwrap().decode_pixels().unwrap();
    assert_eq!(mask.alpha(0, 0), 0);
    assert_eq!(mask.alpha(8, 8), 255);
}

#[test]
fn empty_selection_is_rejected() {
    let err = prepare_edit("x", &base(), Vec::new(), &SketchOptions::default()).unwrap_err();
    assert!(matches!(err, SketchError::EmptySelection(_)));
}

#[test]
fn selection_entirely_off_canvas_counts_as_empty() {
    let err = prepare_edit("x", &base(), [10_000usize], &SketchOptions::default()).unwrap_err();
    assert!(matches!(err, SketchError::EmptySelection(_)));
}

#[test]
fn blank_prompt_fails_before_encoding() {
    let err = prepare_edit(" ", &base(), square(0, 4, 16), &SketchOptions::default()).unwrap_err();
    assert!(matches!(err, SketchError::Validation(_)));
}

#[test]
fn thin_selection_on_wide_canvas_survives_heavy_feathering() {
    // radius = ceil(2600 * 0.1) = 260, so every boundary pixel of a one-row band fades to 0.
    let base = PixelBuffer::filled(2600, 4, [40, 90, 160, 255]).unwrap();
    let row: Vec<usize> = (2600..5200).collect();
    let opts = SketchOptions::default().with_feather_amount(0.1);

    let req = prepare_edit("brighten the band", &base, row, &opts).unwrap();
    assert_eq!(req.mode, GenerationMode::Edit);
    assert_eq!(req.feather_amount, 0.1);

    let mask = req.mask_image.as_ref().unwrap().decode_pixels().unwrap();
    assert!(mask.alpha_plane().iter().all(|&a| a == 0));
}
