//! Voicing stage: one padded narration clip per segment.

/// Speech synthesizers.
pub mod synth;

use std::path::{Path, PathBuf};

use anyhow::Context as _;

pub use synth::{CommandSynthesizer, SpeechSynthesizer};

use crate::audio::resolve;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::segment::SegmentId;
use crate::media::tools::MediaTools;
use crate::script::model::Script;

/// Raw voice file of a segment: `voice_intro.<ext>`, `voice_<i>.<ext>`.
pub fn voice_path(audio_dir: &Path, id: SegmentId, extension: &str) -> PathBuf {
    audio_dir.join(format!("voice_{}.{extension}", id.file_stem()))
}

/// Fill every missing voice clip of `script`.
///
/// Segments that already carry a clip are left alone. An existing raw voice file is reused
/// instead of re-synthesized; without a synthesizer every missing file is an input error.
///
/// A reused file is still resolved, which pads it again: one already padded by an earlier run
/// grows by one more second each time. Persist the voiced script and assemble from it rather
/// than voicing the same audio directory twice.
#[tracing::instrument(skip_all, fields(audio_dir = %audio_dir.display()))]
pub fn voice_script(
    script: &mut Script,
    synth: Option<&dyn SpeechSynthesizer>,
    tools: &dyn MediaTools,
    audio_dir: &Path,
    extension: &str,
) -> ReelResult<()> {
    std::fs::create_dir_all(audio_dir)
        .with_context(|| format!("create audio directory '{}'", audio_dir.display()))?;

    for id in SegmentId::playback_order(script.highlights.len()) {
        if script.voice_clip(id).is_some() {
            tracing::debug!(segment = %id, "voice clip already present");
            continue;
        }
        let text = script
            .segment_text(id)
            .ok_or_else(|| ReelError::input(format!("script has no {id}")))?
            .to_string();
        let path = voice_path(audio_dir, id, extension);

        if path.is_file() {
            tracing::info!(segment = %id, path = %path.display(), "reusing voice file");
        } else {
            let synth = synth.ok_or_else(|| {
                ReelError::input(format!(
                    "no voice command configured and '{}' does not exist",
                    path.display()
                ))
            })?;
            synth.synthesize(&text, &path)?;
            tracing::info!(segment = %id, path = %path.display(), "synthesized voice");
        }

        let clip = resolve(tools, &path)?.into_voice_clip(text);
        script.set_voice_clip(id, clip)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/voice/voice_script.rs"]
mod tests;
