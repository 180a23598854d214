use super::*;

#[test]
fn renders_one_file_line_per_entry_in_order() {
    let mut m = ConcatManifest::new();
    m.push("/stage/clips/clip_intro.mp4");
    m.push("/stage/clips/clip_0.mp4");
    m.push("/stage/clips/clip_1.mp4");
    assert_eq!(
        m.render(),
        "file '/stage/clips/clip_intro.mp4'\nfile '/stage/clips/clip_0.mp4'\nfile '/stage/clips/clip_1.mp4'\n"
    );
    assert_eq!(m.len(), 3);
}

#[test]
fn single_quotes_are_escaped_and_parse_back() {
    let mut m = ConcatManifest::new();
    m.push("/tmp/it's here/voice_0.mp3");
    let text = m.render();
    assert_eq!(text, "file '/tmp/it'\\''s here/voice_0.mp3'\n");
    assert_eq!(ConcatManifest::parse(&text).unwrap(), m);
}

#[test]
fn parse_rejects_foreign_lines() {
    assert!(ConcatManifest::parse("duration 3\n").is_err());
}

#[test]
fn empty_manifest_is_never_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concat.txt");
    assert!(ConcatManifest::new().write_to(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn write_and_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concat.txt");
    let mut m = ConcatManifest::new();
    m.push(dir.path().join("a.mp4"));
    m.push(dir.path().join("b.mp4"));
    m.write_to(&path).unwrap();
    assert_eq!(ConcatManifest::read_from(&path).unwrap(), m);
}
