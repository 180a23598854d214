use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

/// Rasterized code listing, decoded once and shared by every frame.
#[derive(Clone)]
pub struct CodeImage {
    width: u32,
    height: u32,
    paint: vello_cpu::Image,
}

impl CodeImage {
    /// Read and decode an image file.
    pub fn open(path: &Path) -> ReelResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read code image '{}'", path.display()))?;
        Self::decode(&bytes)
    }

    /// Decode encoded image bytes (PNG, JPEG, ...).
    pub fn decode(bytes: &[u8]) -> ReelResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode code image")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba8(width, height, rgba.into_raw())
    }

    /// Build from straight-alpha RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::input("code image must not be empty"));
        }
        if rgba8.len() != width as usize * height as usize * 4 {
            return Err(ReelError::input("code image byte length mismatch"));
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| ReelError::input("code image width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| ReelError::input("code image height exceeds u16"))?;

        let mut may_have_opacities = false;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for px in rgba8.chunks_exact(4) {
            let a = px[3];
            may_have_opacities |= a != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                r: premul(px[0], a),
                g: premul(px[1], a),
                b: premul(px[2], a),
                a,
            });
        }
        let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);

        Ok(Self {
            width,
            height,
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn paint(&self) -> &vello_cpu::Image {
        &self.paint
    }
}

impl std::fmt::Debug for CodeImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

fn premul(c: u8, a: u8) -> u8 {
    ((u16::from(c) * u16::from(a) + 127) / 255) as u8
}
