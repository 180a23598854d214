use std::fmt;

/// Pipeline stage an external tool is invoked from.
///
/// Carried by [`ReelError::MediaTool`](crate::ReelError::MediaTool) so a failed run can report
/// where it stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Text-to-speech for one segment.
    Synthesize,
    /// Probing and padding a voice clip.
    ResolveDuration,
    /// Frame + clip for the intro segment.
    RenderingIntro,
    /// Frame + clip for highlight segments.
    RenderingHighlights,
    /// Lossless concatenation of all segment clips.
    ConcatVideo,
    /// Concatenation of all voice clips.
    ConcatAudio,
    /// Final audio/video mux.
    Mux,
}

impl Stage {
    /// Stable snake_case name used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Synthesize => "synthesize",
            Stage::ResolveDuration => "resolve_duration",
            Stage::RenderingIntro => "rendering_intro",
            Stage::RenderingHighlights => "rendering_highlights",
            Stage::ConcatVideo => "concat_video",
            Stage::ConcatAudio => "concat_audio",
            Stage::Mux => "mux",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
