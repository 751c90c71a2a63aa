use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TickreelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TickreelError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(TickreelError::asset("x").to_string().contains("asset error:"));
    assert!(TickreelError::render("x").to_string().contains("render error:"));
    assert!(TickreelError::encode("x").to_string().contains("encode error:"));
    assert!(
        TickreelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TickreelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
