use super::*;

#[test]
fn primaries() {
    assert_eq!(rgb_to_hsl(255, 0, 0), Hsl { h: 0, s: 100, l: 50 });
    assert_eq!(rgb_to_hsl(0, 255, 0), Hsl { h: 120, s: 100, l: 50 });
    assert_eq!(rgb_to_hsl(0, 0, 255), Hsl { h: 240, s: 100, l: 50 });
}

#[test]
fn greys_have_no_hue_or_saturation() {
    assert_eq!(rgb_to_hsl(0, 0, 0), Hsl { h: 0, s: 0, l: 0 });
    assert_eq!(rgb_to_hsl(255, 255, 255), Hsl { h: 0, s: 0, l: 100 });
    assert_eq!(rgb_to_hsl(128, 128, 128), Hsl { h: 0, s: 0, l: 50 });
}

#[test]
fn magenta_wraps_hue_past_300() {
    assert_eq!(rgb_to_hsl(255, 0, 255).h, 300);
    assert_eq!(rgb_to_hsl(255, 0, 128).h, 330);
}

#[test]
fn display_is_css_hsl() {
    assert_eq!(Hsl::from_rgb(255, 0, 0).to_string(), "hsl(0, 100%, 50%)");
}
