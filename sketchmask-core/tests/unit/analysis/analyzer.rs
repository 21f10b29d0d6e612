use super::*;

fn stroke_sketch() -> PixelBuffer {
    let mut buf = PixelBuffer::transparent(64, 48).unwrap();
    for x in 8..56 {
        for y in 20..24 {
            buf.set_rgba(x, y, [220, 30, 30, 255]);
        }
    }
    for y in 4..44 {
        for x in 30..33 {
            buf.set_rgba(x, y, [30, 30, 220, 255]);
        }
    }
    buf
}

#[test]
fn transparent_canvas_yields_empty_channels() {
    let buf = PixelBuffer::transparent(100, 100).unwrap();
    let a = analyze_sketch(&buf, &SketchOptions::default()).unwrap();
    assert!(a.structural_map.line_geometry.is_empty());
    assert!(a.color_map.is_empty());
    assert_eq!(a.structural_map.confidence_score, 0.0);
    assert!(!a.has_strokes());
    assert_eq!(a.feather_amount, 0.03);
}

#[test]
fn channels_match_the_standalone_passes() {
    let buf = stroke_sketch();
    let opts = SketchOptions::default();
    let a = analyze_sketch(&buf, &opts).unwrap();

    assert_eq!(
        a.structural_map,
        extract_structural_map(&buf, opts.structure_weight)
    );
    assert_eq!(a.color_map, extract_color_guidance(&buf, opts.color_weight));

    let mask = a.binary_mask.decode_pixels().unwrap();
    let expected = create_feathered_mask(&buf, opts.feather_amount).unwrap();
    assert_eq!(mask.alpha_plane(), expected.alpha_plane());
}

#[test]
fn summary_reports_counts_and_confidence() {
    let a = analyze_sketch(&stroke_sketch(), &SketchOptions::default()).unwrap();
    let s = a.summary();
    assert_eq!(s.color_regions, 2);
    assert!(s.structural_segments >= 1);
    assert!(s.confidence > 0.0 && s.confidence <= 1.0);
    assert!(a.has_strokes());
}

#[test]
fn invalid_options_are_rejected_before_work() {
    let buf = stroke_sketch();
    let opts = SketchOptions::default().with_feather_amount(f64::INFINITY);
    assert!(analyze_sketch(&buf, &opts).is_err());
}

#[test]
fn analysis_serializes_with_wire_field_names() {
    let a = analyze_sketch(&stroke_sketch(), &SketchOptions::default()).unwrap();
    let json = serde_json::to_value(&a).unwrap();
    for key in ["binaryMask", "structuralMap", "colorMap", "featherAmount"] {
        assert!(json.get(key).is_some(), "{key}");
    }
    assert!(
        json["binaryMask"]
            .as_str()
            .unwrap()
            .starts_with("data:image/webp;base64,")
    );

    let back: SketchAnalysis = serde_json::from_value(json).unwrap();
    assert_eq!(back, a);
}
