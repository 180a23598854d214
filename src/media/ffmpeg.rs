use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::ReelConfig;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::stage::Stage;
use crate::media::tools::MediaTools;

const STDERR_TAIL_CHARS: usize = 500;

/// [`MediaTools`] backed by the system `ffmpeg` and `ffprobe` binaries.
#[derive(Clone, Debug)]
pub struct FfmpegTools {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    fps: u32,
    video_codec: String,
    pix_fmt: String,
    audio_codec: String,
}

impl FfmpegTools {
    /// Tools configured from `cfg.tools` and `cfg.encode`.
    pub fn new(cfg: &ReelConfig) -> Self {
        Self {
            ffmpeg: cfg.tools.ffmpeg.clone(),
            ffprobe: cfg.tools.ffprobe.clone(),
            fps: cfg.encode.fps,
            video_codec: cfg.encode.video_codec.clone(),
            pix_fmt: cfg.encode.pix_fmt.clone(),
            audio_codec: cfg.encode.audio_codec.clone(),
        }
    }

    /// Return `true` when both binaries can be invoked.
    pub fn available(&self) -> bool {
        [&self.ffmpeg, &self.ffprobe].into_iter().all(|bin| {
            Command::new(bin)
                .arg("-version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|s| s.success())
                .unwrap_or(false)
        })
    }

    fn ffmpeg_args(&self) -> Vec<OsString> {
        vec!["-hide_banner".into(), "-loglevel".into(), "error".into(), "-y".into()]
    }

    fn run(&self, stage: Stage, program: &Path, args: &[OsString]) -> ReelResult<Vec<u8>> {
        let command = describe(program, args);
        tracing::debug!(%stage, %command, "running media tool");

        let out = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                let status = if e.kind() == std::io::ErrorKind::NotFound {
                    format!("'{}' not found (is it installed and on PATH?)", program.display())
                } else {
                    format!("failed to spawn: {e}")
                };
                ReelError::media_tool(stage, command.clone(), status, "")
            })?;

        if !out.status.success() {
            return Err(ReelError::media_tool(
                stage,
                command,
                out.status.to_string(),
                stderr_tail(&out.stderr),
            ));
        }
        Ok(out.stdout)
    }

    fn run_ffmpeg(&self, stage: Stage, args: Vec<OsString>, artifact: &Path) -> ReelResult<()> {
        let mut full = self.ffmpeg_args();
        full.extend(args);
        full.push(artifact.as_os_str().to_owned());
        self.run(stage, &self.ffmpeg, &full)?;
        ensure_artifact(stage, &describe(&self.ffmpeg, &full), artifact)
    }
}

impl MediaTools for FfmpegTools {
    #[tracing::instrument(skip(self), level = "debug")]
    fn probe_duration(&self, audio: &Path) -> ReelResult<f64> {
        #[derive(serde::Deserialize)]
        struct ProbeFormat {
            duration: Option<String>,
        }
        #[derive(serde::Deserialize)]
        struct ProbeOut {
            format: ProbeFormat,
        }

        let args: Vec<OsString> = vec![
            "-v".into(),
            "error".into(),
            "-print_format".into(),
            "json".into(),
            "-show_format".into(),
            audio.as_os_str().to_owned(),
        ];
        let stdout = self.run(Stage::ResolveDuration, &self.ffprobe, &args)?;
        let parsed: ProbeOut = serde_json::from_slice(&stdout).map_err(|e| {
            ReelError::media_tool(
                Stage::ResolveDuration,
                describe(&self.ffprobe, &args),
                "unparseable output",
                format!("ffprobe json parse failed: {e}"),
            )
        })?;
        let raw = parsed.format.duration.ok_or_else(|| {
            ReelError::input(format!("ffprobe reports no duration for '{}'", audio.display()))
        })?;
        raw.trim().parse::<f64>().map_err(|e| {
            ReelError::input(format!(
                "ffprobe duration '{raw}' for '{}' is not a number: {e}",
                audio.display()
            ))
        })
    }

    #[tracing::instrument(skip(self), level = "debug")]
    fn pad_audio(&self, src: &Path, dst: &Path, target_seconds: u32) -> ReelResult<()> {
        let args: Vec<OsString> = vec![
            "-i".into(),
            src.as_os_str().to_owned(),
            "-af".into(),
            format!("apad=whole_dur={target_seconds}").into(),
        ];
        self.run_ffmpeg(Stage::ResolveDuration, args, dst)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    fn still_to_video(
        &self,
        stage: Stage,
        frame: &Path,
        seconds: u32,
        clip: &Path,
    ) -> ReelResult<()> {
        let args: Vec<OsString> = vec![
            "-loop".into(),
            "1".into(),
            "-framerate".into(),
            self.fps.to_string().into(),
            "-i".into(),
            frame.as_os_str().to_owned(),
            "-t".into(),
            seconds.to_string().into(),
            "-r".into(),
            self.fps.to_string().into(),
            "-c:v".into(),
            self.video_codec.clone().into(),
            "-tune".into(),
            "stillimage".into(),
            "-pix_fmt".into(),
            self.pix_fmt.clone().into(),
            "-an".into(),
        ];
        self.run_ffmpeg(stage, args, clip)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    fn concat_streams(
        &self,
        stage: Stage,
        manifest: &Path,
        same_codec: bool,
        out: &Path,
    ) -> ReelResult<()> {
        let mut args: Vec<OsString> = vec![
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            manifest.as_os_str().to_owned(),
        ];
        if same_codec {
            args.extend(["-c".into(), "copy".into()]);
        } else if stage == Stage::ConcatAudio {
            args.extend(["-vn".into(), "-c:a".into(), self.audio_codec.clone().into()]);
        } else {
            args.extend([
                "-an".into(),
                "-c:v".into(),
                self.video_codec.clone().into(),
                "-pix_fmt".into(),
                self.pix_fmt.clone().into(),
            ]);
        }
        self.run_ffmpeg(stage, args, out)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    fn mux(&self, video: &Path, audio: &Path, audio_offset_sec: f64, out: &Path) -> ReelResult<()> {
        let args: Vec<OsString> = vec![
            "-i".into(),
            video.as_os_str().to_owned(),
            "-itsoffset".into(),
            format!("{audio_offset_sec:.3}").into(),
            "-i".into(),
            audio.as_os_str().to_owned(),
            "-map".into(),
            "0:v".into(),
            "-map".into(),
            "1:a".into(),
            "-c:v".into(),
            "copy".into(),
            "-c:a".into(),
            self.audio_codec.clone().into(),
            "-movflags".into(),
            "+faststart".into(),
        ];
        self.run_ffmpeg(Stage::Mux, args, out)
    }
}

fn ensure_artifact(stage: Stage, command: &str, artifact: &Path) -> ReelResult<()> {
    match std::fs::metadata(artifact) {
        Ok(meta) if meta.len() > 0 => Ok(()),
        Ok(_) => Err(ReelError::media_tool(
            stage,
            command,
            "exited successfully",
            format!("output '{}' is empty", artifact.display()),
        )),
        Err(e) => Err(ReelError::media_tool(
            stage,
            command,
            "exited successfully",
            format!("output '{}' is missing: {e}", artifact.display()),
        )),
    }
}

pub(crate) fn describe(program: &Path, args: &[OsString]) -> String {
    let mut parts = vec![program.display().to_string()];
    parts.extend(args.iter().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

pub(crate) fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let chars = text.trim().chars().collect::<Vec<_>>();
    let start = chars.len().saturating_sub(STDERR_TAIL_CHARS);
    chars[start..].iter().collect()
}
