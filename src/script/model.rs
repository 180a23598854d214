use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::segment::SegmentId;
use crate::geometry::NO_HIGHLIGHT_LINE;

/// A synthesized, padded narration clip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceClip {
    /// Narration text the clip was synthesized from.
    pub text: String,
    /// Location of the padded audio file.
    pub file_path: PathBuf,
    /// Padded length in whole seconds (>= 1).
    pub duration_seconds: u32,
}

/// One highlighted region of the code listing with its narration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighlightSegment {
    /// Narration for this segment.
    pub text: String,
    /// Zero-based first highlighted line, or `-1` for no highlight.
    pub line_number: i64,
    /// Number of highlighted lines (`0` draws nothing).
    pub line_count: i64,
    /// Filled in by the voicing stage.
    #[serde(default)]
    pub voice_clip: Option<VoiceClip>,
}

impl HighlightSegment {
    /// Highlight with no voice clip yet.
    pub fn new(text: impl Into<String>, line_number: i64, line_count: i64) -> Self {
        Self {
            text: text.into(),
            line_number,
            line_count,
            voice_clip: None,
        }
    }
}

/// A generated walkthrough script.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Full text of the code listing.
    pub code: String,
    /// Narration for the opening segment.
    pub intro_text: String,
    /// Highlights in playback order.
    #[serde(default)]
    pub highlights: Vec<HighlightSegment>,
    /// Trailing call-to-action text. Not rendered.
    #[serde(default)]
    pub cta_text: Option<String>,
    /// Voice clip of the intro, filled in by the voicing stage.
    #[serde(default)]
    pub intro_voice_clip: Option<VoiceClip>,
}

impl Script {
    /// Number of lines in the code listing.
    pub fn total_lines(&self) -> usize {
        self.code.lines().count()
    }

    /// Number of segments (intro plus highlights).
    pub fn segment_count(&self) -> usize {
        1 + self.highlights.len()
    }

    /// Narration text of a segment.
    pub fn segment_text(&self, id: SegmentId) -> Option<&str> {
        match id {
            SegmentId::Intro => Some(self.intro_text.as_str()),
            SegmentId::Highlight(i) => self.highlights.get(i).map(|h| h.text.as_str()),
        }
    }

    /// Voice clip of a segment, if synthesized.
    pub fn voice_clip(&self, id: SegmentId) -> Option<&VoiceClip> {
        match id {
            SegmentId::Intro => self.intro_voice_clip.as_ref(),
            SegmentId::Highlight(i) => self.highlights.get(i)?.voice_clip.as_ref(),
        }
    }

    /// Attach a voice clip to a segment.
    pub fn set_voice_clip(&mut self, id: SegmentId, clip: VoiceClip) -> ReelResult<()> {
        match id {
            SegmentId::Intro => self.intro_voice_clip = Some(clip),
            SegmentId::Highlight(i) => {
                let h = self.highlights.get_mut(i).ok_or_else(|| {
                    ReelError::input(format!("script has no highlight {i}"))
                })?;
                h.voice_clip = Some(clip);
            }
        }
        Ok(())
    }

    /// `(line_number, line_count)` drawn for a segment; the intro never highlights.
    pub fn segment_lines(&self, id: SegmentId) -> Option<(i64, i64)> {
        match id {
            SegmentId::Intro => Some((NO_HIGHLIGHT_LINE, 0)),
            SegmentId::Highlight(i) => self.highlights.get(i).map(|h| (h.line_number, h.line_count)),
        }
    }

    /// Read a script from JSON.
    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read script '{}'", path.display()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ReelError::serde(format!("parse script '{}': {e}", path.display())))
    }

    /// Write a script as pretty-printed JSON.
    pub fn write_json_file(&self, path: &Path) -> ReelResult<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| ReelError::serde(format!("serialize script: {e}")))?;
        crate::foundation::ensure_parent_dir(path)?;
        std::fs::write(path, json)
            .with_context(|| format!("write script '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;
