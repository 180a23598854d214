use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(ReelError::input("x").to_string().contains("input error:"));
    assert!(
        ReelError::geometry("x")
            .to_string()
            .contains("geometry error:")
    );
    assert!(
        ReelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn media_tool_display_names_stage_and_command() {
    let err = ReelError::media_tool(
        Stage::ConcatVideo,
        "ffmpeg -f concat",
        "exit status: 1",
        "No such file",
    );
    let msg = err.to_string();
    assert!(msg.contains("concat_video"));
    assert!(msg.contains("ffmpeg -f concat"));
    assert!(msg.contains("exit status: 1"));
    assert!(msg.contains("No such file"));
    assert_eq!(err.stage(), Some(Stage::ConcatVideo));
    assert!(!err.is_input());
}

#[test]
fn geometry_counts_as_input() {
    assert!(ReelError::geometry("bad bounds").is_input());
    assert!(ReelError::input("missing clip").is_input());
    assert_eq!(ReelError::input("x").stage(), None);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
