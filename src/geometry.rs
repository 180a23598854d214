//! Highlight placement on the code image.
//!
//! Pure math: a highlight `(line_number, line_count)` becomes a rounded rectangle in the code
//! image's own pixel space. The frame renderer translates it onto the canvas.

use kurbo::Rect;

use crate::foundation::error::{ReelError, ReelResult};

/// Line number that marks "no highlight" (used by the intro frame).
pub const NO_HIGHLIGHT_LINE: i64 = -1;

/// Rounded highlight rectangle in code-image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighlightRect {
    /// Rectangle bounds (`x0`/`y0` top-left, `x1`/`y1` bottom-right).
    pub bounds: Rect,
    /// Radius applied to all four corners.
    pub corner_radius: f64,
}

impl HighlightRect {
    /// Top edge.
    pub fn top(&self) -> f64 {
        self.bounds.y0
    }

    /// Rectangle height.
    pub fn height(&self) -> f64 {
        self.bounds.height()
    }

    /// Rectangle width.
    pub fn width(&self) -> f64 {
        self.bounds.width()
    }
}

/// Maps highlight line ranges to rectangles for a fixed rasterizer calibration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighlightGeometry {
    /// Vertical distance between consecutive code lines, in pixels.
    pub line_pitch_px: f64,
    /// Extra rectangle height so the box overlaps line boundaries.
    pub vertical_padding_px: f64,
    /// Corner radius for all four corners.
    pub corner_radius_px: f64,
}

impl Default for HighlightGeometry {
    fn default() -> Self {
        crate::config::HighlightConfig::default().geometry()
    }
}

impl HighlightGeometry {
    /// Line pitch measured from a reference render: `height_px` spans exactly `rows` lines.
    pub fn from_reference_rows(height_px: f64, rows: u32) -> ReelResult<f64> {
        if rows == 0 || !(height_px.is_finite() && height_px > 0.0) {
            return Err(ReelError::input(
                "reference rows and height must be positive",
            ));
        }
        Ok(height_px / f64::from(rows))
    }

    /// Line pitch of a rasterizer that advances `font_px` plus `line_gap_px` per line.
    pub fn from_font_metrics(font_px: f64, line_gap_px: f64) -> ReelResult<f64> {
        let pitch = font_px + line_gap_px;
        if !(pitch.is_finite() && pitch > 0.0 && font_px > 0.0 && line_gap_px >= 0.0) {
            return Err(ReelError::input(
                "font size must be > 0 and line gap >= 0",
            ));
        }
        Ok(pitch)
    }

    /// Rectangle for a highlight, or `None` when nothing should be drawn.
    ///
    /// `line_number == -1` (the intro sentinel) and `line_count == 0` yield `None`. A negative
    /// `line_count` is a [`ReelError::Geometry`] even with the sentinel, as is any other
    /// out-of-range value.
    pub fn rect(
        &self,
        line_number: i64,
        line_count: i64,
        code_image_width_px: u32,
        total_code_lines: usize,
    ) -> ReelResult<Option<HighlightRect>> {
        if line_count < 0 {
            return Err(ReelError::geometry(format!(
                "line_count must be >= 0, got {line_count}"
            )));
        }
        if line_number == NO_HIGHLIGHT_LINE {
            return Ok(None);
        }
        if line_number < 0 {
            return Err(ReelError::geometry(format!(
                "line_number must be >= 0 or {NO_HIGHLIGHT_LINE}, got {line_number}"
            )));
        }
        let total = i64::try_from(total_code_lines).unwrap_or(i64::MAX);
        if line_number >= total {
            return Err(ReelError::geometry(format!(
                "line_number {line_number} is outside the code listing ({total} lines)"
            )));
        }
        if line_count == 0 {
            return Ok(None);
        }
        if line_number.saturating_add(line_count) > total {
            return Err(ReelError::geometry(format!(
                "lines {line_number}..{} run past the end of the code listing ({total} lines)",
                line_number.saturating_add(line_count)
            )));
        }

        let y = self.line_pitch_px * line_number as f64;
        let height = self.line_pitch_px * line_count as f64 + self.vertical_padding_px;
        Ok(Some(HighlightRect {
            bounds: Rect::new(0.0, y, f64::from(code_image_width_px), y + height),
            corner_radius: self.corner_radius_px,
        }))
    }
}

#[cfg(test)]
#[path = "../tests/unit/geometry/geometry.rs"]
mod tests;
