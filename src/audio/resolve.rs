use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};
use crate::media::tools::MediaTools;
use crate::script::model::VoiceClip;

/// A voice clip padded to a whole number of seconds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAudio {
    /// The padded file (same path as the input).
    pub path: PathBuf,
    /// Length after padding, always >= 1.
    pub duration_seconds: u32,
}

impl ResolvedAudio {
    /// Pair with its narration text.
    pub fn into_voice_clip(self, text: impl Into<String>) -> VoiceClip {
        VoiceClip {
            text: text.into(),
            file_path: self.path,
            duration_seconds: self.duration_seconds,
        }
    }
}

/// Whole seconds a clip of `seconds` is padded to.
///
/// Always rounds up past the real length, so an exact `3.0` becomes `4`.
pub fn padded_seconds(seconds: f64) -> ReelResult<u32> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(ReelError::input(format!(
            "audio duration must be positive, got {seconds}"
        )));
    }
    let whole = seconds.floor() + 1.0;
    if whole > f64::from(u32::MAX) {
        return Err(ReelError::input(format!("audio duration {seconds}s is too long")));
    }
    Ok(whole as u32)
}

/// Probe `raw_path`, pad it in place with trailing silence to a whole number of seconds and
/// return the padded length.
///
/// The padded audio is written to a temporary file next to the source and renamed over it, so an
/// interrupted run leaves either the unpadded or the padded file behind.
#[tracing::instrument(skip(tools), level = "debug")]
pub fn resolve(tools: &dyn MediaTools, raw_path: &Path) -> ReelResult<ResolvedAudio> {
    let seconds = tools.probe_duration(raw_path)?;
    let target = padded_seconds(seconds).map_err(|e| match e {
        ReelError::Input(msg) => ReelError::input(format!("'{}': {msg}", raw_path.display())),
        other => other,
    })?;
    pad_in_place(tools, raw_path, target)?;
    tracing::debug!(probed = seconds, padded = target, "resolved voice clip");
    Ok(ResolvedAudio {
        path: raw_path.to_path_buf(),
        duration_seconds: target,
    })
}

fn pad_in_place(tools: &dyn MediaTools, path: &Path, target_seconds: u32) -> ReelResult<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let tmp = tempfile::Builder::new()
        .prefix(".codereel-pad-")
        .suffix(&suffix)
        .tempfile_in(&dir)
        .with_context(|| format!("create temp file in '{}'", dir.display()))?;

    tools.pad_audio(path, tmp.path(), target_seconds)?;

    tmp.persist(path)
        .map_err(|e| anyhow::Error::new(e.error))
        .with_context(|| format!("replace '{}' with padded audio", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/audio/resolve.rs"]
mod tests;
