use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::ReelResult;
use crate::foundation::segment::SegmentId;

/// Working directory layout of one assembly run.
///
/// ```text
/// <root>/frames/frame_{intro,i}.png
/// <root>/clips/clip_{intro,i}.mp4, concat.txt, combined.mp4
/// <root>/audio/concat.txt, combined.<ext>
/// ```
///
/// All paths are absolute so manifests resolve independently of the tool's working directory.
#[derive(Clone, Debug)]
pub struct Staging {
    root: PathBuf,
    frames: PathBuf,
    clips: PathBuf,
    audio: PathBuf,
}

impl Staging {
    /// Create the staging directories under `root`.
    pub fn create(root: &Path) -> ReelResult<Self> {
        let root = std::path::absolute(root)
            .with_context(|| format!("resolve staging directory '{}'", root.display()))?;
        let staging = Self {
            frames: root.join("frames"),
            clips: root.join("clips"),
            audio: root.join("audio"),
            root,
        };
        for dir in [&staging.frames, &staging.clips, &staging.audio] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create staging directory '{}'", dir.display()))?;
        }
        Ok(staging)
    }

    /// Staging root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Still frame of a segment.
    pub fn frame_path(&self, id: SegmentId) -> PathBuf {
        self.frames.join(format!("frame_{}.png", id.file_stem()))
    }

    /// Silent clip of a segment.
    pub fn clip_path(&self, id: SegmentId) -> PathBuf {
        self.clips.join(format!("clip_{}.mp4", id.file_stem()))
    }

    /// Concat manifest of the segment clips.
    pub fn video_manifest(&self) -> PathBuf {
        self.clips.join("concat.txt")
    }

    /// Concatenated video.
    pub fn combined_video(&self) -> PathBuf {
        self.clips.join("combined.mp4")
    }

    /// Concat manifest of the voice clips.
    pub fn audio_manifest(&self) -> PathBuf {
        self.audio.join("concat.txt")
    }

    /// Concatenated narration with the voice clips' extension.
    pub fn combined_audio(&self, extension: &str) -> PathBuf {
        self.audio.join(format!("combined.{extension}"))
    }
}
