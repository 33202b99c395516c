use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(SegueError::input("x").to_string().contains("input error:"));
    assert!(
        SegueError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SegueError::analysis("x")
            .to_string()
            .contains("analysis error:")
    );
    assert!(
        SegueError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SegueError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_input_errors_are_per_unit() {
    assert!(SegueError::input("missing.png").is_per_unit());
    assert!(!SegueError::validation("bad").is_per_unit());
    assert!(!SegueError::analysis("pool").is_per_unit());
}

#[test]
fn replay_keeps_variant_and_message() {
    let err = SegueError::validation("bad bpm").replay();
    assert!(matches!(err, SegueError::Validation(ref m) if m == "bad bpm"));
    let other = SegueError::Other(anyhow::anyhow!("disk gone")).replay();
    assert!(matches!(other, SegueError::Other(_)));
    assert!(other.to_string().contains("disk gone"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: SegueError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, SegueError::Serde(_)));
}
