use std::io::Cursor;

use super::*;

#[test]
fn new_rejects_zero_dimensions_and_bad_length() {
    assert!(matches!(
        PixelBuffer::new(0, 4, vec![]),
        Err(SketchError::Validation(_))
    ));
    assert!(matches!(
        PixelBuffer::new(2, 2, vec![0; 15]),
        Err(SketchError::Validation(_))
    ));
    PixelBuffer::new(2, 2, vec![0; 16]).unwrap();
}

#[test]
fn accessors_are_row_major() {
    let mut buf = PixelBuffer::transparent(3, 2).unwrap();
    buf.set_rgba(2, 1, [1, 2, 3, 200]);
    assert_eq!(buf.rgba(2, 1), [1, 2, 3, 200]);
    assert_eq!(buf.alpha(2, 1), 200);
    assert_eq!(&buf.as_bytes()[20..24], &[1, 2, 3, 200]);
    assert_eq!(buf.strong_pixel_count(), 1);
    assert_eq!(buf.alpha_plane(), vec![0, 0, 0, 0, 0, 200]);
}

#[test]
fn checked_accessors_reject_out_of_range_coordinates() {
    let mut buf = PixelBuffer::transparent(4, 4).unwrap();
    assert_eq!(buf.get_rgba(9, 0), None);
    assert_eq!(buf.get_rgba(0, 4), None);
    assert!(matches!(
        buf.try_set_rgba(4, 0, [1, 1, 1, 1]),
        Err(SketchError::Validation(_))
    ));
    buf.try_set_rgba(3, 3, [1, 2, 3, 4]).unwrap();
    assert_eq!(buf.get_rgba(3, 3), Some([1, 2, 3, 4]));
}

#[test]
#[should_panic(expected = "outside 4x4")]
fn unchecked_alpha_panics_past_the_row_end() {
    // (9, 0) would alias into row 2 without the bounds check.
    let buf = PixelBuffer::transparent(4, 4).unwrap();
    let _ = buf.alpha(9, 0);
}

#[test]
fn strong_pixels_exclude_the_threshold_itself() {
    let mut buf = PixelBuffer::transparent(2, 1).unwrap();
    buf.set_rgba(0, 0, [0, 0, 0, 128]);
    buf.set_rgba(1, 0, [0, 0, 0, 129]);
    assert_eq!(buf.strong_pixel_count(), 1);
}

#[test]
fn decode_png_keeps_straight_alpha() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100, 50, 200, 128]).unwrap();
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();

    let buf = PixelBuffer::decode(&bytes).unwrap();
    assert_eq!((buf.width(), buf.height()), (1, 1));
    assert_eq!(buf.rgba(0, 0), [100, 50, 200, 128]);
}

#[test]
fn decode_garbage_is_wrapped_error() {
    let err = PixelBuffer::decode(b"not an image").unwrap_err();
    assert!(matches!(err, SketchError::Other(_)));
}

#[test]
fn region_extents_and_overlap() {
    let a = Region::from_extents(0, 0, 4, 4);
    let b = Region::from_extents(4, 4, 9, 6);
    let c = Region::from_extents(5, 0, 9, 3);
    assert_eq!(a.width, 4);
    assert!(a.contains(Point { x: 4, y: 4 }));
    assert!(!a.contains(Point { x: 5, y: 4 }));
    assert!(a.intersects(&b));
    assert!(!a.intersects(&c));
}

#[test]
fn scratch_allocation_overflow_is_context_unavailable() {
    assert!(matches!(
        rgba_len(u32::MAX, u32::MAX),
        Err(SketchError::ContextUnavailable(_))
    ));
    assert_eq!(alloc_scratch(2, 3).unwrap().len(), 24);
}
