use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::stage::Stage;
use crate::media::manifest::ConcatManifest;
use crate::media::tools::MediaTools;

/// One invocation observed by [`RecordingTools`].
#[derive(Clone, Debug, PartialEq)]
pub enum ToolCall {
    /// [`MediaTools::probe_duration`].
    Probe {
        /// Probed file.
        audio: PathBuf,
    },
    /// [`MediaTools::pad_audio`].
    Pad {
        /// Source clip.
        src: PathBuf,
        /// Padded output.
        dst: PathBuf,
        /// Requested length.
        target_seconds: u32,
    },
    /// [`MediaTools::still_to_video`].
    StillToVideo {
        /// Calling stage.
        stage: Stage,
        /// Input frame.
        frame: PathBuf,
        /// Clip length.
        seconds: u32,
        /// Output clip.
        clip: PathBuf,
    },
    /// [`MediaTools::concat_streams`].
    Concat {
        /// Calling stage.
        stage: Stage,
        /// Entries read from the manifest at call time.
        entries: Vec<PathBuf>,
        /// Whether a stream copy was requested.
        same_codec: bool,
        /// Output file.
        out: PathBuf,
    },
    /// [`MediaTools::mux`].
    Mux {
        /// Video input.
        video: PathBuf,
        /// Audio input.
        audio: PathBuf,
        /// Audio delay.
        audio_offset_sec: f64,
        /// Output file.
        out: PathBuf,
    },
}

/// In-process [`MediaTools`] for tests and dry runs.
///
/// Records every call, reports configured durations and writes small placeholder artifacts so
/// the pipeline's file handling runs exactly as it does with real tools.
#[derive(Debug)]
pub struct RecordingTools {
    durations: HashMap<PathBuf, f64>,
    default_duration: f64,
    fail_on: Option<Stage>,
    fail_on_clip: Option<String>,
    clip_delays: HashMap<String, Duration>,
    calls: Mutex<Vec<ToolCall>>,
}

impl Default for RecordingTools {
    fn default() -> Self {
        Self {
            durations: HashMap::new(),
            default_duration: 1.0,
            fail_on: None,
            fail_on_clip: None,
            clip_delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingTools {
    /// Tools reporting 1.0s for every file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `seconds` when `path` is probed.
    pub fn with_duration(mut self, path: impl Into<PathBuf>, seconds: f64) -> Self {
        self.durations.insert(path.into(), seconds);
        self
    }

    /// Report `seconds` for files without an explicit duration.
    pub fn with_default_duration(mut self, seconds: f64) -> Self {
        self.default_duration = seconds;
        self
    }

    /// Fail every call made from `stage`.
    pub fn fail_on(mut self, stage: Stage) -> Self {
        self.fail_on = Some(stage);
        self
    }

    /// Fail the clip encode whose output file is named `file_name`.
    pub fn fail_on_clip(mut self, file_name: impl Into<String>) -> Self {
        self.fail_on_clip = Some(file_name.into());
        self
    }

    /// Sleep before finishing the clip encode whose output file is named `file_name`.
    pub fn delay_clip(mut self, file_name: impl Into<String>, delay: Duration) -> Self {
        self.clip_delays.insert(file_name.into(), delay);
        self
    }

    /// Calls in the order they completed.
    pub fn calls(&self) -> Vec<ToolCall> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ToolCall>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: ToolCall) {
        self.lock().push(call);
    }

    fn check(&self, stage: Stage, command: &str) -> ReelResult<()> {
        if self.fail_on == Some(stage) {
            return Err(ReelError::media_tool(
                stage,
                command,
                "exit status: 1",
                "injected failure",
            ));
        }
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write_placeholder(path: &Path, what: &str) -> ReelResult<()> {
    std::fs::write(path, what.as_bytes())
        .with_context(|| format!("write placeholder '{}'", path.display()))?;
    Ok(())
}

impl MediaTools for RecordingTools {
    fn probe_duration(&self, audio: &Path) -> ReelResult<f64> {
        self.check(Stage::ResolveDuration, "probe")?;
        if !audio.exists() {
            return Err(ReelError::media_tool(
                Stage::ResolveDuration,
                "probe",
                "exit status: 1",
                format!("{}: No such file or directory", audio.display()),
            ));
        }
        self.record(ToolCall::Probe {
            audio: audio.to_path_buf(),
        });
        Ok(self
            .durations
            .get(audio)
            .copied()
            .unwrap_or(self.default_duration))
    }

    fn pad_audio(&self, src: &Path, dst: &Path, target_seconds: u32) -> ReelResult<()> {
        self.check(Stage::ResolveDuration, "pad")?;
        std::fs::copy(src, dst)
            .with_context(|| format!("copy '{}' to '{}'", src.display(), dst.display()))?;
        self.record(ToolCall::Pad {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            target_seconds,
        });
        Ok(())
    }

    fn still_to_video(
        &self,
        stage: Stage,
        frame: &Path,
        seconds: u32,
        clip: &Path,
    ) -> ReelResult<()> {
        let name = file_name(clip);
        if let Some(delay) = self.clip_delays.get(&name) {
            std::thread::sleep(*delay);
        }
        self.check(stage, "still_to_video")?;
        if self.fail_on_clip.as_deref() == Some(name.as_str()) {
            return Err(ReelError::media_tool(
                stage,
                "still_to_video",
                "exit status: 1",
                format!("injected failure for {name}"),
            ));
        }
        if !frame.is_file() {
            return Err(ReelError::media_tool(
                stage,
                "still_to_video",
                "exit status: 1",
                format!("{}: No such file or directory", frame.display()),
            ));
        }
        write_placeholder(clip, &format!("clip {seconds}s"))?;
        self.record(ToolCall::StillToVideo {
            stage,
            frame: frame.to_path_buf(),
            seconds,
            clip: clip.to_path_buf(),
        });
        Ok(())
    }

    fn concat_streams(
        &self,
        stage: Stage,
        manifest: &Path,
        same_codec: bool,
        out: &Path,
    ) -> ReelResult<()> {
        self.check(stage, "concat")?;
        let entries = ConcatManifest::read_from(manifest)?.entries().to_vec();
        write_placeholder(out, "concat")?;
        self.record(ToolCall::Concat {
            stage,
            entries,
            same_codec,
            out: out.to_path_buf(),
        });
        Ok(())
    }

    fn mux(&self, video: &Path, audio: &Path, audio_offset_sec: f64, out: &Path) -> ReelResult<()> {
        self.check(Stage::Mux, "mux")?;
        write_placeholder(out, "mux")?;
        self.record(ToolCall::Mux {
            video: video.to_path_buf(),
            audio: audio.to_path_buf(),
            audio_offset_sec,
            out: out.to_path_buf(),
        });
        Ok(())
    }
}
