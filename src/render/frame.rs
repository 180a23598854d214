use std::io::Cursor;
use std::path::Path;

use anyhow::Context as _;
use vello_cpu::kurbo::Shape as _;

use crate::config::{CanvasConfig, ReelConfig};
use crate::foundation::error::{ReelError, ReelResult};
use crate::geometry::HighlightRect;
use crate::render::code_image::CodeImage;

/// Composited still frame, straight-alpha RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub data: Vec<u8>,
}

impl FrameImage {
    /// Encode as PNG.
    pub fn encode_png(&self) -> ReelResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| ReelError::input("frame buffer size mismatch"))?;
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .context("encode frame png")?;
        Ok(out.into_inner())
    }

    /// Encode as PNG and write to `path`.
    pub fn write_png(&self, path: &Path) -> ReelResult<()> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("write frame '{}'", path.display()))?;
        Ok(())
    }
}

/// Composites the code image and an optional highlight onto the fixed canvas.
///
/// Rendering is a pure function of the inputs: the same code image and rectangle always produce
/// the same pixels.
#[derive(Clone, Debug)]
pub struct FrameRenderer {
    canvas: CanvasConfig,
    highlight_rgba: [u8; 4],
}

impl FrameRenderer {
    /// Renderer for the canvas and highlight color of `cfg`.
    pub fn new(cfg: &ReelConfig) -> Self {
        Self {
            canvas: cfg.canvas.clone(),
            highlight_rgba: cfg.highlight.rgba,
        }
    }

    /// Top-left of the code image on the canvas (floor-centered, negative when it overflows).
    pub fn code_offset(&self, code: &CodeImage) -> (i64, i64) {
        (
            (i64::from(self.canvas.width) - i64::from(code.width())).div_euclid(2),
            (i64::from(self.canvas.height) - i64::from(code.height())).div_euclid(2),
        )
    }

    /// Render one frame.
    #[tracing::instrument(skip(self, code), level = "debug")]
    pub fn render(
        &self,
        code: &CodeImage,
        highlight: Option<&HighlightRect>,
    ) -> ReelResult<FrameImage> {
        let width: u16 = self
            .canvas
            .width
            .try_into()
            .map_err(|_| ReelError::input("canvas width exceeds u16"))?;
        let height: u16 = self
            .canvas
            .height
            .try_into()
            .map_err(|_| ReelError::input("canvas height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let [r, g, b, a] = self.canvas.background_rgba;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));

        let (ox, oy) = self.code_offset(code);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((ox as f64, oy as f64)));
        ctx.set_paint(code.paint().clone());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(code.width()),
            f64::from(code.height()),
        ));

        if let Some(rect) = highlight {
            let [r, g, b, a] = self.highlight_rgba;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            let shape = vello_cpu::kurbo::RoundedRect::new(
                rect.bounds.x0,
                rect.bounds.y0,
                rect.bounds.x1,
                rect.bounds.y1,
                rect.corner_radius,
            );
            ctx.fill_path(&shape.to_path(0.1));
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        Ok(FrameImage {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
        })
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 || a == 0 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
