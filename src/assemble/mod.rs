//! Sequencing of a voiced script into the final video.
//!
//! [`Assembler::run`] walks a fixed state machine:
//!
//! ```text
//! Init -> RenderingIntro -> RenderingHighlights -> ConcatVideo -> ConcatAudio -> Mux -> Done
//! ```
//!
//! Any error moves it to [`AssemblyState::Failed`] and is returned unchanged. Everything is
//! validated in `Init`, before the first external tool runs and before the staging directory is
//! created. The output path is only ever written by renaming a finished mux result onto it.

/// Staging directory layout.
pub mod staging;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::Context as _;
use rayon::prelude::*;

pub use staging::Staging;

use crate::config::ReelConfig;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::segment::SegmentId;
use crate::foundation::stage::Stage;
use crate::geometry::HighlightRect;
use crate::media::manifest::ConcatManifest;
use crate::media::tools::MediaTools;
use crate::render::code_image::CodeImage;
use crate::render::frame::FrameRenderer;
use crate::script::model::{Script, VoiceClip};

/// Position of an [`Assembler`] in its state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssemblyState {
    /// Validating the script and inputs.
    Init,
    /// Frame and clip for the intro.
    RenderingIntro,
    /// Frames and clips for all highlights, in parallel.
    RenderingHighlights,
    /// Concatenating segment clips.
    ConcatVideo,
    /// Concatenating voice clips.
    ConcatAudio,
    /// Muxing video and narration into the output.
    Mux,
    /// Output written.
    Done,
    /// A step failed; see [`Assembler::failed_at`].
    Failed,
}

impl AssemblyState {
    /// Stable snake_case name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            AssemblyState::Init => "init",
            AssemblyState::RenderingIntro => "rendering_intro",
            AssemblyState::RenderingHighlights => "rendering_highlights",
            AssemblyState::ConcatVideo => "concat_video",
            AssemblyState::ConcatAudio => "concat_audio",
            AssemblyState::Mux => "mux",
            AssemblyState::Done => "done",
            AssemblyState::Failed => "failed",
        }
    }
}

impl fmt::Display for AssemblyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a finished run.
#[derive(Clone, Debug)]
pub struct AssemblyReport {
    /// Final muxed video.
    pub output: PathBuf,
    /// Sum of all segment durations.
    pub total_seconds: u64,
    /// Number of segments, intro included.
    pub segments: usize,
    /// Clip manifest passed to the video concat.
    pub video_manifest: ConcatManifest,
    /// Voice manifest passed to the audio concat.
    pub audio_manifest: ConcatManifest,
}

/// Everything one segment needs, checked in `Init`.
struct SegmentPlan<'s> {
    id: SegmentId,
    clip: &'s VoiceClip,
    highlight: Option<HighlightRect>,
}

/// Files produced for one segment.
#[derive(Clone, Debug)]
struct SegmentArtifacts {
    clip: PathBuf,
    audio: PathBuf,
    seconds: u32,
}

/// Drives one assembly run over a [`MediaTools`] implementation.
pub struct Assembler<'a> {
    tools: &'a dyn MediaTools,
    cfg: &'a ReelConfig,
    state: AssemblyState,
    failed_at: Option<AssemblyState>,
}

impl<'a> Assembler<'a> {
    /// Assembler in the `Init` state.
    pub fn new(tools: &'a dyn MediaTools, cfg: &'a ReelConfig) -> Self {
        Self {
            tools,
            cfg,
            state: AssemblyState::Init,
            failed_at: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> AssemblyState {
        self.state
    }

    /// State the last run failed in.
    pub fn failed_at(&self) -> Option<AssemblyState> {
        self.failed_at
    }

    /// Assemble `script` into `out_path`, staging intermediates under `staging_dir`.
    #[tracing::instrument(skip(self, script), fields(segments = script.segment_count()))]
    pub fn run(
        &mut self,
        script: &Script,
        code_image: &Path,
        staging_dir: &Path,
        out_path: &Path,
    ) -> ReelResult<AssemblyReport> {
        self.state = AssemblyState::Init;
        self.failed_at = None;

        match self.run_states(script, code_image, staging_dir, out_path) {
            Ok(report) => {
                self.enter(AssemblyState::Done);
                Ok(report)
            }
            Err(err) => {
                tracing::error!(state = %self.state, error = %err, "assembly failed");
                self.failed_at = Some(self.state);
                self.state = AssemblyState::Failed;
                Err(err)
            }
        }
    }

    fn enter(&mut self, next: AssemblyState) {
        tracing::info!(from = %self.state, to = %next, "assembly state");
        self.state = next;
    }

    fn run_states(
        &mut self,
        script: &Script,
        code_image: &Path,
        staging_dir: &Path,
        out_path: &Path,
    ) -> ReelResult<AssemblyReport> {
        let (plans, code) = self.validate(script, code_image)?;
        let renderer = FrameRenderer::new(self.cfg);
        let staging = Staging::create(staging_dir)?;

        self.enter(AssemblyState::RenderingIntro);
        let mut slots: Vec<Option<SegmentArtifacts>> = vec![None; plans.len()];
        slots[0] = Some(render_segment(
            self.tools,
            &renderer,
            &code,
            &staging,
            &plans[0],
            Stage::RenderingIntro,
        )?);

        self.enter(AssemblyState::RenderingHighlights);
        let slots = self.render_highlights(&renderer, &code, &staging, &plans[1..], slots)?;

        let artifacts = slots
            .into_iter()
            .enumerate()
            .map(|(slot, a)| {
                a.ok_or_else(|| {
                    ReelError::Other(anyhow::anyhow!(
                        "{} finished without artifacts",
                        SegmentId::from_slot(slot)
                    ))
                })
            })
            .collect::<ReelResult<Vec<SegmentArtifacts>>>()?;

        self.enter(AssemblyState::ConcatVideo);
        let mut video_manifest = ConcatManifest::new();
        for a in &artifacts {
            video_manifest.push(&a.clip);
        }
        video_manifest.write_to(&staging.video_manifest())?;
        let combined_video = staging.combined_video();
        self.tools.concat_streams(
            Stage::ConcatVideo,
            &staging.video_manifest(),
            true,
            &combined_video,
        )?;

        self.enter(AssemblyState::ConcatAudio);
        let mut audio_manifest = ConcatManifest::new();
        for a in &artifacts {
            audio_manifest.push(&a.audio);
        }
        audio_manifest.write_to(&staging.audio_manifest())?;
        let extension = artifacts[0]
            .audio
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.cfg.voice.extension.clone());
        let combined_audio = staging.combined_audio(&extension);
        self.tools.concat_streams(
            Stage::ConcatAudio,
            &staging.audio_manifest(),
            true,
            &combined_audio,
        )?;

        self.enter(AssemblyState::Mux);
        self.mux_atomically(&combined_video, &combined_audio, out_path)?;
        tracing::info!(output = %out_path.display(), "wrote video");

        Ok(AssemblyReport {
            output: out_path.to_path_buf(),
            total_seconds: artifacts.iter().map(|a| u64::from(a.seconds)).sum(),
            segments: artifacts.len(),
            video_manifest,
            audio_manifest,
        })
    }

    fn validate<'s>(
        &self,
        script: &'s Script,
        code_image: &Path,
    ) -> ReelResult<(Vec<SegmentPlan<'s>>, CodeImage)> {
        self.cfg.validate()?;

        let mut clips = Vec::with_capacity(script.segment_count());
        for id in SegmentId::playback_order(script.highlights.len()) {
            let clip = script
                .voice_clip(id)
                .ok_or_else(|| ReelError::input(format!("{id} has no voice clip")))?;
            if clip.duration_seconds < 1 {
                return Err(ReelError::input(format!(
                    "{id} voice clip has duration {}s, expected >= 1",
                    clip.duration_seconds
                )));
            }
            clips.push((id, clip));
        }

        let code = CodeImage::open(code_image).map_err(|e| {
            ReelError::input(format!(
                "code image '{}' is not readable: {e}",
                code_image.display()
            ))
        })?;

        let geometry = self.cfg.highlight.geometry();
        let total_lines = script.total_lines();
        let mut plans = Vec::with_capacity(clips.len());
        for (id, clip) in clips {
            let (line, count) = script
                .segment_lines(id)
                .ok_or_else(|| ReelError::input(format!("script has no {id}")))?;
            let highlight = geometry
                .rect(line, count, code.width(), total_lines)
                .map_err(|e| ReelError::input(format!("{id}: {e}")))?;
            plans.push(SegmentPlan {
                id,
                clip,
                highlight,
            });
        }
        Ok((plans, code))
    }

    fn render_highlights(
        &self,
        renderer: &FrameRenderer,
        code: &CodeImage,
        staging: &Staging,
        plans: &[SegmentPlan<'_>],
        slots: Vec<Option<SegmentArtifacts>>,
    ) -> ReelResult<Vec<Option<SegmentArtifacts>>> {
        if plans.is_empty() {
            return Ok(slots);
        }
        let pool = build_thread_pool(self.cfg.threads)?;
        let slots = Mutex::new(slots);
        let tools = self.tools;
        pool.install(|| {
            plans.par_iter().try_for_each(|plan| -> ReelResult<()> {
                let artifacts = render_segment(
                    tools,
                    renderer,
                    code,
                    staging,
                    plan,
                    Stage::RenderingHighlights,
                )?;
                slots.lock().unwrap_or_else(PoisonError::into_inner)[plan.id.slot()] =
                    Some(artifacts);
                Ok(())
            })
        })?;
        Ok(slots.into_inner().unwrap_or_else(PoisonError::into_inner))
    }

    fn mux_atomically(&self, video: &Path, audio: &Path, out_path: &Path) -> ReelResult<()> {
        crate::foundation::ensure_parent_dir(out_path)?;
        let dir = match out_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let suffix = out_path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_else(|| ".mp4".to_string());
        let tmp = tempfile::Builder::new()
            .prefix(".codereel-mux-")
            .suffix(&suffix)
            .tempfile_in(&dir)
            .with_context(|| format!("create temp file in '{}'", dir.display()))?;

        self.tools
            .mux(video, audio, self.cfg.encode.start_offset_sec, tmp.path())?;

        tmp.persist(out_path)
            .map_err(|e| anyhow::Error::new(e.error))
            .with_context(|| format!("move muxed video to '{}'", out_path.display()))?;
        Ok(())
    }
}

/// Assemble `script` with a fresh [`Assembler`].
pub fn assemble_video(
    tools: &dyn MediaTools,
    cfg: &ReelConfig,
    script: &Script,
    code_image: &Path,
    staging_dir: &Path,
    out_path: &Path,
) -> ReelResult<AssemblyReport> {
    Assembler::new(tools, cfg).run(script, code_image, staging_dir, out_path)
}

#[tracing::instrument(skip_all, fields(segment = %plan.id))]
fn render_segment(
    tools: &dyn MediaTools,
    renderer: &FrameRenderer,
    code: &CodeImage,
    staging: &Staging,
    plan: &SegmentPlan<'_>,
    stage: Stage,
) -> ReelResult<SegmentArtifacts> {
    let frame_path = staging.frame_path(plan.id);
    renderer
        .render(code, plan.highlight.as_ref())?
        .write_png(&frame_path)?;

    let clip_path = staging.clip_path(plan.id);
    let seconds = plan.clip.duration_seconds;
    tools.still_to_video(stage, &frame_path, seconds, &clip_path)?;
    tracing::debug!(clip = %clip_path.display(), seconds, "encoded segment clip");

    let audio = std::path::absolute(&plan.clip.file_path).with_context(|| {
        format!("resolve voice clip '{}'", plan.clip.file_path.display())
    })?;
    Ok(SegmentArtifacts {
        clip: clip_path,
        audio,
        seconds,
    })
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/assembler.rs"]
mod tests;
