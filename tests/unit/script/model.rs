use super::*;

fn sample() -> Script {
    Script {
        code: "import tensorflow as tf\n\nx = 1\ny = 2\n".to_string(),
        intro_text: "Hello".to_string(),
        highlights: vec![
            HighlightSegment::new("imports", 0, 1),
            HighlightSegment::new("assignments", 2, 2),
        ],
        cta_text: None,
        intro_voice_clip: None,
    }
}

#[test]
fn trailing_newline_does_not_add_a_line() {
    assert_eq!(sample().total_lines(), 4);
}

#[test]
fn segment_accessors_follow_playback_order() {
    let mut s = sample();
    assert_eq!(s.segment_count(), 3);
    assert_eq!(s.segment_text(SegmentId::Intro), Some("Hello"));
    assert_eq!(s.segment_text(SegmentId::Highlight(1)), Some("assignments"));
    assert_eq!(s.segment_lines(SegmentId::Intro), Some((-1, 0)));
    assert_eq!(s.segment_lines(SegmentId::Highlight(1)), Some((2, 2)));
    assert_eq!(s.segment_text(SegmentId::Highlight(2)), None);

    let clip = VoiceClip {
        text: "imports".to_string(),
        file_path: PathBuf::from("voice_0.mp3"),
        duration_seconds: 2,
    };
    s.set_voice_clip(SegmentId::Highlight(0), clip.clone()).unwrap();
    assert_eq!(s.voice_clip(SegmentId::Highlight(0)), Some(&clip));
    assert_eq!(s.voice_clip(SegmentId::Intro), None);
    assert!(s.set_voice_clip(SegmentId::Highlight(9), clip).is_err());
}

#[test]
fn json_without_optional_fields_parses() {
    let s: Script = serde_json::from_str(
        r#"{
            "code": "a\nb",
            "intro_text": "hi",
            "highlights": [{ "text": "b", "line_number": 1, "line_count": 1 }]
        }"#,
    )
    .unwrap();
    assert_eq!(s.highlights[0].voice_clip, None);
    assert_eq!(s.intro_voice_clip, None);
    assert_eq!(s.cta_text, None);
}

#[test]
fn write_then_read_keeps_voice_clips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("script.json");
    let mut s = sample();
    s.intro_voice_clip = Some(VoiceClip {
        text: "Hello".to_string(),
        file_path: PathBuf::from("voice_intro.mp3"),
        duration_seconds: 3,
    });
    s.write_json_file(&path).unwrap();
    assert_eq!(Script::from_json_file(&path).unwrap(), s);
}
