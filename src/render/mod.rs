//! Still-frame rendering on the CPU.
//!
//! One frame per segment: the fixed dark canvas, the code image centered on it, and at most one
//! translucent highlight rectangle. Pixels come from `vello_cpu`; PNG encoding from `image`.

/// Decoded code listing image.
pub mod code_image;
/// Frame compositing and PNG output.
pub mod frame;
