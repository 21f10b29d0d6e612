use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SketchError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SketchError::context_unavailable("x")
            .to_string()
            .contains("context unavailable:")
    );
    assert!(
        SketchError::encoding("x")
            .to_string()
            .contains("encoding failure:")
    );
    assert!(
        SketchError::empty_selection("x")
            .to_string()
            .contains("empty selection:")
    );
    assert!(
        SketchError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn size_limit_message_names_the_attachment() {
    let err = SketchError::SizeLimitExceeded {
        label: "mask".to_string(),
        bytes: 8_000_000,
        limit: 7 * 1024 * 1024,
    };
    let msg = err.to_string();
    assert!(msg.starts_with("size limit exceeded: mask"));
    assert!(msg.contains("8000000"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SketchError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
