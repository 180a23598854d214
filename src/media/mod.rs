//! External media tooling.
//!
//! [`MediaTools`] is the seam between the pipeline and the encoder: [`FfmpegTools`] shells out
//! to `ffmpeg`/`ffprobe`, [`RecordingTools`] stands in for them in tests and dry runs.

/// `ffmpeg`/`ffprobe` implementation.
pub mod ffmpeg;
/// Concat demuxer file lists.
pub mod manifest;
/// Recording fake for tests and dry runs.
pub mod recording;
/// The [`MediaTools`] trait.
pub mod tools;

pub use ffmpeg::FfmpegTools;
pub use manifest::ConcatManifest;
pub use recording::{RecordingTools, ToolCall};
pub use tools::MediaTools;
