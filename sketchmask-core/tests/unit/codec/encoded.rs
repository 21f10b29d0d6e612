use super::*;

fn checker(w: u32, h: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::transparent(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            if (x + y) % 2 == 0 {
                buf.set_rgba(x, y, [255, 255, 255, 255]);
            }
        }
    }
    buf
}

#[test]
fn webp_is_the_default_and_self_describing() {
    let enc = encode_lossless(&checker(8, 8)).unwrap();
    assert!(enc.as_str().starts_with("data:image/webp;base64,"));
    assert_eq!(enc.mime(), "image/webp");
    assert_eq!(enc.format(), Some(LosslessFormat::WebP));
    assert!(!enc.payload().is_empty());
}

#[test]
fn webp_round_trip_preserves_alpha() {
    let src = checker(9, 5);
    let enc = encode_lossless(&src).unwrap();
    let back = enc.decode_pixels().unwrap();
    assert_eq!((back.width(), back.height()), (9, 5));
    assert_eq!(back.alpha_plane(), src.alpha_plane());
}

#[test]
fn png_round_trip_is_exact() {
    let mut src = checker(4, 4);
    src.set_rgba(1, 0, [12, 34, 56, 78]);
    let enc = encode_lossless_as(&src, LosslessFormat::Png).unwrap();
    assert_eq!(enc.mime(), "image/png");
    assert_eq!(enc.decode_pixels().unwrap(), src);
}

#[test]
fn parse_accepts_image_data_urls_only() {
    EncodedImage::parse("data:image/webp;base64,AAAA").unwrap();
    EncodedImage::parse("  data:image/png;base64,AAAA\n").unwrap();

    for bad in [
        "AAAA",
        "data:image/png;base64",
        "data:image/png,AAAA",
        "data:text/plain;base64,AAAA",
    ] {
        assert!(
            matches!(EncodedImage::parse(bad), Err(SketchError::Validation(_))),
            "{bad}"
        );
    }
}

#[test]
fn serde_uses_the_bare_string() {
    let enc = EncodedImage::from_bytes("image/png", &[1, 2, 3]);
    let json = serde_json::to_string(&enc).unwrap();
    assert_eq!(json, "\"data:image/png;base64,AQID\"");
    let back: EncodedImage = serde_json::from_str(&json).unwrap();
    assert_eq!(back, enc);
    assert!(serde_json::from_str::<EncodedImage>("\"nope\"").is_err());
}

#[test]
fn bad_base64_payload_is_validation_error() {
    let enc = EncodedImage::parse("data:image/png;base64,!!!").unwrap();
    assert!(matches!(enc.decode_bytes(), Err(SketchError::Validation(_))));
}

#[test]
fn debug_does_not_dump_the_payload() {
    let enc = EncodedImage::from_bytes("image/png", &[0u8; 300]);
    let dbg = format!("{enc:?}");
    assert!(dbg.contains("image/png"));
    assert!(dbg.len() < 100);
}
