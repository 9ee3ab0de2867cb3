use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RouteCamError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        RouteCamError::degenerate("x")
            .to_string()
            .contains("degenerate geometry:")
    );
    assert!(
        RouteCamError::calculation("x")
            .to_string()
            .contains("calculation error:")
    );
    assert!(
        RouteCamError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        RouteCamError::RenderTimeout { waited_ms: 2500 }
            .to_string()
            .contains("2500 ms")
    );
}

#[test]
fn cancelled_is_distinguishable() {
    assert!(RouteCamError::Cancelled.is_cancelled());
    assert!(!RouteCamError::surface("gone").is_cancelled());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RouteCamError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
