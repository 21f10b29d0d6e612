use super::*;

fn fill_rect(buf: &mut PixelBuffer, x0: u32, y0: u32, x1: u32, y1: u32, rgba: [u8; 4]) {
    for y in y0..y1 {
        for x in x0..x1 {
            buf.set_rgba(x, y, rgba);
        }
    }
}

#[test]
fn quantize_uses_32_unit_steps() {
    assert_eq!(quantize(0, 0, 0), 0);
    assert_eq!(quantize(31, 31, 31), 0);
    assert_eq!(quantize(32, 0, 0), 64);
    assert_eq!(quantize(255, 255, 255), 511);
}

#[test]
fn full_red_canvas_is_one_saturated_region() {
    let buf = PixelBuffer::filled(50, 50, [255, 0, 0, 255]).unwrap();
    let out = extract_color_guidance(&buf, 0.3);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].color, "hsl(0, 100%, 50%)");
    assert_eq!(out[0].region, Region::from_extents(0, 0, 49, 49));
    assert_eq!(out[0].weight, 1.0);
}

#[test]
fn small_buckets_are_dropped() {
    let mut buf = PixelBuffer::transparent(20, 20).unwrap();
    fill_rect(&mut buf, 0, 0, 3, 3, [0, 0, 255, 255]); // 9 px
    fill_rect(&mut buf, 10, 10, 12, 15, [0, 255, 0, 255]); // 10 px
    let out = extract_color_guidance(&buf, 0.3);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].color, "hsl(120, 100%, 50%)");
    assert_eq!(out[0].region, Region::from_extents(10, 10, 11, 14));
}

#[test]
fn representative_is_first_seen_pixel_not_average() {
    let mut buf = PixelBuffer::transparent(10, 2).unwrap();
    fill_rect(&mut buf, 0, 0, 10, 1, [200, 0, 0, 255]);
    fill_rect(&mut buf, 0, 1, 10, 2, [223, 31, 31, 255]);
    let out = extract_color_guidance(&buf, 0.3);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].color, Hsl::from_rgb(200, 0, 0).to_string());
}

#[test]
fn weak_pixels_are_ignored() {
    let buf = PixelBuffer::filled(10, 10, [255, 0, 0, 128]).unwrap();
    assert!(extract_color_guidance(&buf, 1.0).is_empty());
}

#[test]
fn weight_scales_with_coverage_and_color_weight() {
    let mut buf = PixelBuffer::transparent(100, 100).unwrap();
    fill_rect(&mut buf, 0, 0, 10, 2, [0, 0, 0, 255]); // 20 px of 10_000
    let out = extract_color_guidance(&buf, 0.3);
    assert!((out[0].weight - 20.0 / 10_000.0 * 100.0 * 0.3).abs() < 1e-6);
}

#[test]
fn adjacent_buckets_keep_separate_regions_in_scan_order() {
    let mut buf = PixelBuffer::transparent(20, 10).unwrap();
    fill_rect(&mut buf, 0, 0, 10, 10, [250, 10, 10, 255]);
    fill_rect(&mut buf, 10, 0, 20, 10, [10, 10, 250, 255]);
    let out = extract_color_guidance(&buf, 0.3);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].region, Region::from_extents(0, 0, 9, 9));
    assert_eq!(out[1].region, Region::from_extents(10, 0, 19, 9));
}
