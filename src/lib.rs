//! Codereel turns a narrated code walkthrough into a portrait video.
//!
//! A [`Script`] pairs a code listing with an intro and a list of highlighted line ranges, each
//! with narration. The pipeline is:
//!
//! - Voice every segment and pad each clip to whole seconds ([`voice_script`], [`resolve`])
//! - Render one still frame per segment with the highlight drawn over the code image
//!   ([`FrameRenderer`])
//! - Encode each frame into a clip as long as its narration, concatenate clips and narration in
//!   the same order and mux them ([`Assembler`])
//!
//! External encoding goes through the [`MediaTools`] trait; [`FfmpegTools`] is the production
//! implementation.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod audio;
pub mod assemble;
pub mod config;
pub mod geometry;
pub mod media;
pub mod render;
pub mod script;
pub mod voice;

pub use crate::foundation::ensure_parent_dir;
pub use crate::foundation::error::{ReelError, ReelResult};
pub use crate::foundation::segment::SegmentId;
pub use crate::foundation::stage::Stage;

pub use crate::assemble::{AssemblyReport, AssemblyState, Assembler, assemble_video};
pub use crate::audio::{ResolvedAudio, resolve};
pub use crate::config::ReelConfig;
pub use crate::geometry::{HighlightGeometry, HighlightRect, NO_HIGHLIGHT_LINE};
pub use crate::media::{ConcatManifest, FfmpegTools, MediaTools, RecordingTools, ToolCall};
pub use crate::render::code_image::CodeImage;
pub use crate::render::frame::{FrameImage, FrameRenderer};
pub use crate::script::model::{HighlightSegment, Script, VoiceClip};
pub use crate::script::table::{annotate_line_numbers, parse_highlight_table};
pub use crate::voice::{CommandSynthesizer, SpeechSynthesizer, voice_script};
