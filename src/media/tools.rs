use std::path::Path;

use crate::foundation::error::ReelResult;
use crate::foundation::stage::Stage;

/// Contract for the external encoding/muxing engine.
///
/// Every method blocks until the tool exits. Implementations must return an error when the tool
/// fails or when the expected output artifact is missing or empty; callers never check exit codes
/// themselves.
pub trait MediaTools: Send + Sync {
    /// Real-valued duration of an audio file, in seconds.
    fn probe_duration(&self, audio: &Path) -> ReelResult<f64>;

    /// Write `src` padded with trailing silence to exactly `target_seconds` into `dst`.
    fn pad_audio(&self, src: &Path, dst: &Path, target_seconds: u32) -> ReelResult<()>;

    /// Encode a silent clip holding `frame` for `seconds` seconds.
    fn still_to_video(
        &self,
        stage: Stage,
        frame: &Path,
        seconds: u32,
        clip: &Path,
    ) -> ReelResult<()>;

    /// Concatenate the files listed in a concat manifest into `out`.
    ///
    /// With `same_codec` the streams are copied, not re-encoded.
    fn concat_streams(
        &self,
        stage: Stage,
        manifest: &Path,
        same_codec: bool,
        out: &Path,
    ) -> ReelResult<()>;

    /// Mux `video` with `audio` delayed by `audio_offset_sec`, copying the video stream.
    fn mux(&self, video: &Path, audio: &Path, audio_offset_sec: f64, out: &Path)
    -> ReelResult<()>;
}
