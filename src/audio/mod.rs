//! Voice clip duration resolution.

/// Probing and padding of a single clip.
pub mod resolve;

pub use resolve::{ResolvedAudio, padded_seconds, resolve};
