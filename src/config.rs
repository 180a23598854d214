//! Run configuration.
//!
//! Everything that the pipeline needs besides the script itself lives in [`ReelConfig`]. It is
//! plain data: load it from JSON (every field optional), tweak it, and pass it by reference into
//! the stages that need it. Nothing here is global.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{ReelError, ReelResult};
use crate::geometry::HighlightGeometry;

/// Full pipeline configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ReelConfig {
    /// Output canvas.
    pub canvas: CanvasConfig,
    /// Highlight overlay calibration and color.
    pub highlight: HighlightConfig,
    /// Clip encoding and mux settings.
    pub encode: EncodeConfig,
    /// External tool binaries.
    pub tools: ToolPaths,
    /// Voice file naming and synthesis.
    pub voice: VoiceConfig,
    /// Worker threads for segment rendering (`None` = rayon default).
    pub threads: Option<usize>,
}

/// Fixed portrait canvas every frame is composited onto.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Background color (RGBA8, straight alpha).
    pub background_rgba: [u8; 4],
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            background_rgba: [31, 31, 31, 255],
        }
    }
}

/// Highlight rectangle calibration.
///
/// `line_pitch_px` must match the line pitch of whatever rasterized the code image. The default
/// reproduces the reference rasterizer (371 px over 11 rows).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HighlightConfig {
    /// Vertical distance between consecutive code lines in the code image.
    pub line_pitch_px: f64,
    /// Extra height added to every rectangle so it overlaps line boundaries.
    pub vertical_padding_px: f64,
    /// Corner radius applied to all four corners.
    pub corner_radius_px: f64,
    /// Fill color (RGBA8, straight alpha).
    pub rgba: [u8; 4],
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            line_pitch_px: 371.0 / 11.0,
            vertical_padding_px: 14.0,
            corner_radius_px: 25.0,
            rgba: [255, 0, 0, 26],
        }
    }
}

impl HighlightConfig {
    /// Geometry mapper for this calibration.
    pub fn geometry(&self) -> HighlightGeometry {
        HighlightGeometry {
            line_pitch_px: self.line_pitch_px,
            vertical_padding_px: self.vertical_padding_px,
            corner_radius_px: self.corner_radius_px,
        }
    }
}

/// Clip encoding and final mux settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeConfig {
    /// Frame rate of every still clip.
    pub fps: u32,
    /// Encoder for still clips.
    pub video_codec: String,
    /// Pixel format of still clips (yuv420p for player compatibility).
    pub pix_fmt: String,
    /// Encoder for the final audio track.
    pub audio_codec: String,
    /// Delay of the audio track relative to the start of the video, in seconds.
    pub start_offset_sec: f64,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            video_codec: "libx264".to_string(),
            pix_fmt: "yuv420p".to_string(),
            audio_codec: "aac".to_string(),
            start_offset_sec: 0.0,
        }
    }
}

/// Locations of the `ffmpeg` and `ffprobe` binaries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolPaths {
    /// `ffmpeg` executable (looked up on `PATH` when relative).
    pub ffmpeg: PathBuf,
    /// `ffprobe` executable (looked up on `PATH` when relative).
    pub ffprobe: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

/// Voice file naming and the optional synthesis command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VoiceConfig {
    /// Extension of voice files (`voice_intro.<ext>`, `voice_0.<ext>`, ...).
    pub extension: String,
    /// Argv template for a text-to-speech command; `{text}` and `{out}` are substituted.
    pub command: Option<Vec<String>>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            extension: "mp3".to_string(),
            command: None,
        }
    }
}

impl ReelConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: ReelConfig = serde_json::from_slice(&bytes).map_err(|e| {
            ReelError::serde(format!("parse config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the pipeline cannot honor.
    pub fn validate(&self) -> ReelResult<()> {
        let c = &self.canvas;
        if c.width == 0 || c.height == 0 {
            return Err(ReelError::input("canvas width/height must be non-zero"));
        }
        if !c.width.is_multiple_of(2) || !c.height.is_multiple_of(2) {
            return Err(ReelError::input(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        if u16::try_from(c.width).is_err() || u16::try_from(c.height).is_err() {
            return Err(ReelError::input("canvas width/height must fit in u16"));
        }

        let h = &self.highlight;
        if !(h.line_pitch_px.is_finite() && h.line_pitch_px > 0.0) {
            return Err(ReelError::input("highlight line_pitch_px must be > 0"));
        }
        if !(h.vertical_padding_px.is_finite() && h.vertical_padding_px >= 0.0) {
            return Err(ReelError::input("highlight vertical_padding_px must be >= 0"));
        }
        if !(h.corner_radius_px.is_finite() && h.corner_radius_px >= 0.0) {
            return Err(ReelError::input("highlight corner_radius_px must be >= 0"));
        }

        let e = &self.encode;
        if e.fps == 0 {
            return Err(ReelError::input("encode fps must be non-zero"));
        }
        if !(e.start_offset_sec.is_finite() && e.start_offset_sec >= 0.0) {
            return Err(ReelError::input("encode start_offset_sec must be >= 0"));
        }
        if e.video_codec.is_empty() || e.pix_fmt.is_empty() || e.audio_codec.is_empty() {
            return Err(ReelError::input("encode codecs and pix_fmt must be non-empty"));
        }

        if self.tools.ffmpeg.as_os_str().is_empty() || self.tools.ffprobe.as_os_str().is_empty() {
            return Err(ReelError::input("ffmpeg/ffprobe paths must be non-empty"));
        }

        if self.voice.extension.is_empty() || self.voice.extension.contains(['/', '.']) {
            return Err(ReelError::input(
                "voice extension must be a bare extension such as 'mp3'",
            ));
        }
        if let Some(cmd) = &self.voice.command
            && cmd.is_empty()
        {
            return Err(ReelError::input("voice command must not be empty when set"));
        }

        if let Some(n) = self.threads
            && n == 0
        {
            return Err(ReelError::input("threads must be >= 1 when set"));
        }
        Ok(())
    }
}
