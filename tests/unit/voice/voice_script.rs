use std::sync::Mutex;

use super::*;
use crate::media::recording::{RecordingTools, ToolCall};
use crate::script::model::{HighlightSegment, VoiceClip};

#[derive(Default)]
struct FakeSynth {
    spoken: Mutex<Vec<String>>,
}

impl SpeechSynthesizer for FakeSynth {
    fn synthesize(&self, text: &str, out: &Path) -> ReelResult<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        std::fs::write(out, text.as_bytes()).unwrap();
        Ok(())
    }
}

fn script() -> Script {
    Script {
        code: "fn main() {\n    run();\n}\n".to_string(),
        intro_text: "Intro".to_string(),
        highlights: vec![
            HighlightSegment::new("First", 0, 1),
            HighlightSegment::new("Second", 1, 2),
        ],
        cta_text: None,
        intro_voice_clip: None,
    }
}

#[test]
fn voice_paths_follow_segment_position() {
    let dir = Path::new("/audio");
    assert_eq!(
        voice_path(dir, SegmentId::Intro, "mp3"),
        PathBuf::from("/audio/voice_intro.mp3")
    );
    assert_eq!(
        voice_path(dir, SegmentId::Highlight(3), "wav"),
        PathBuf::from("/audio/voice_3.wav")
    );
}

#[test]
fn synthesizes_and_resolves_every_segment() {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("audio");
    let tools = RecordingTools::new()
        .with_duration(audio.join("voice_intro.mp3"), 3.0)
        .with_duration(audio.join("voice_0.mp3"), 1.2)
        .with_duration(audio.join("voice_1.mp3"), 3.7);
    let synth = FakeSynth::default();
    let mut s = script();

    voice_script(&mut s, Some(&synth), &tools, &audio, "mp3").unwrap();

    assert_eq!(
        *synth.spoken.lock().unwrap(),
        vec!["Intro".to_string(), "First".to_string(), "Second".to_string()]
    );
    let intro = s.intro_voice_clip.as_ref().unwrap();
    assert_eq!(intro.duration_seconds, 4);
    assert_eq!(intro.file_path, audio.join("voice_intro.mp3"));
    assert_eq!(intro.text, "Intro");
    assert_eq!(s.highlights[0].voice_clip.as_ref().unwrap().duration_seconds, 2);
    assert_eq!(s.highlights[1].voice_clip.as_ref().unwrap().duration_seconds, 4);
}

#[test]
fn existing_files_are_reused_without_a_synthesizer() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["voice_intro.mp3", "voice_0.mp3", "voice_1.mp3"] {
        std::fs::write(dir.path().join(name), b"voice").unwrap();
    }
    let tools = RecordingTools::new().with_default_duration(1.5);
    let mut s = script();

    voice_script(&mut s, None, &tools, dir.path(), "mp3").unwrap();
    assert!(s.intro_voice_clip.is_some());
    assert!(s.highlights.iter().all(|h| h.voice_clip.is_some()));

    // Reused files are padded again, not trusted as already whole seconds.
    let pads = tools
        .calls()
        .iter()
        .filter(|c| matches!(c, ToolCall::Pad { .. }))
        .count();
    assert_eq!(pads, 3);
    assert_eq!(s.intro_voice_clip.as_ref().unwrap().duration_seconds, 2);
}

#[test]
fn missing_file_without_synthesizer_is_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let tools = RecordingTools::new();
    let mut s = script();
    let err = voice_script(&mut s, None, &tools, dir.path(), "mp3").unwrap_err();
    assert!(err.is_input());
    assert!(err.to_string().contains("voice_intro.mp3"));
    assert!(tools.calls().is_empty());
}

#[test]
fn segments_with_clips_are_not_touched() {
    let dir = tempfile::tempdir().unwrap();
    let tools = RecordingTools::new();
    let synth = FakeSynth::default();
    let mut s = script();
    let kept = VoiceClip {
        text: "Intro".to_string(),
        file_path: PathBuf::from("/elsewhere/intro.mp3"),
        duration_seconds: 6,
    };
    s.intro_voice_clip = Some(kept.clone());

    voice_script(&mut s, Some(&synth), &tools, dir.path(), "mp3").unwrap();

    assert_eq!(s.intro_voice_clip, Some(kept));
    assert_eq!(synth.spoken.lock().unwrap().len(), 2);
    let probed: Vec<_> = tools
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            ToolCall::Probe { audio } => Some(audio),
            _ => None,
        })
        .collect();
    assert_eq!(
        probed,
        vec![dir.path().join("voice_0.mp3"), dir.path().join("voice_1.mp3")]
    );
}
