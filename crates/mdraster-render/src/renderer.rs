//! Software renderer.
//!
//! Executes a [`DisplayList`] against a [`Canvas`]. Rectangles and lines go
//! through tiny-skia's primitives; each glyph's coverage bitmap from the font
//! face is turned into a small premultiplied pixmap in the text color and
//! composited source-over at its pen position.
//!
//! The renderer knows nothing about Markdown, styles or layout. It simply
//! executes drawing commands in order.

use mdraster_font::FontHandle;
use mdraster_layout::{DisplayCommand, DisplayList};
use mdraster_style::ColorValue;
use tiny_skia::{
    ColorU8, Paint, PathBuilder, Pixmap, PixmapPaint, Rect as SkRect, Stroke, Transform,
};

use crate::RenderError;
use crate::canvas::Canvas;

/// Executes display lists onto a canvas.
#[derive(Debug)]
pub struct Renderer {
    canvas: Canvas,
}

impl Renderer {
    /// Allocate a `width` x `height` canvas filled with `background`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] if the canvas cannot be allocated.
    pub fn new(width: u32, height: u32, background: ColorValue) -> Result<Self, RenderError> {
        Ok(Self {
            canvas: Canvas::new(width, height, background)?,
        })
    }

    /// Execute a display list, drawing all commands in order (back to
    /// front).
    pub fn render(&mut self, display_list: &DisplayList) {
        for command in display_list.commands() {
            self.execute_command(command);
        }
    }

    /// The finished canvas.
    #[must_use]
    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    fn execute_command(&mut self, command: &DisplayCommand) {
        match command {
            DisplayCommand::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => self.fill_rect(*x, *y, *width, *height, *color),
            DisplayCommand::DrawLine {
                x1,
                x2,
                y,
                thickness,
                color,
            } => self.draw_line(*x1, *x2, *y, *thickness, *color),
            DisplayCommand::DrawText {
                x,
                y,
                text,
                font,
                color,
            } => self.draw_text(text, *x, *y, font, *color),
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: ColorValue) {
        let Some(rect) = SkRect::from_xywh(x, y, width, height) else {
            return;
        };
        let paint = solid(color);
        self.canvas
            .pixmap_mut()
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn draw_line(&mut self, x1: f32, x2: f32, y: f32, thickness: f32, color: ColorValue) {
        if thickness <= 0.0 || x2 <= x1 {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(x1, y);
        pb.line_to(x2, y);
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width: thickness,
            ..Stroke::default()
        };
        self.canvas.pixmap_mut().stroke_path(
            &path,
            &solid(color),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    /// Draw `text` with its pen starting at `x` on baseline `y`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss
    )]
    fn draw_text(&mut self, text: &str, x: f32, y: f32, font: &FontHandle, color: ColorValue) {
        if color.is_transparent() {
            return;
        }
        let baseline = y.round() as i32;
        let mut pen = x;
        for ch in text.chars() {
            if ch.is_control() {
                continue;
            }
            let glyph = font.rasterize(ch);
            if let Some(bitmap) = glyph_pixmap(&glyph.coverage, glyph.width, glyph.height, color) {
                let left = (pen + glyph.xmin as f32).round() as i32;
                let top = baseline - glyph.ymin - glyph.height as i32;
                self.canvas.pixmap_mut().draw_pixmap(
                    left,
                    top,
                    bitmap.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
            }
            pen += glyph.advance;
        }
    }
}

fn solid(color: ColorValue) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint
}

/// Coverage bitmap tinted with `color`, premultiplied. `None` for empty
/// glyphs (spaces).
#[allow(clippy::cast_possible_truncation)]
fn glyph_pixmap(coverage: &[u8], width: usize, height: usize, color: ColorValue) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(u32::try_from(width).ok()?, u32::try_from(height).ok()?)?;
    for (dst, &cov) in pixmap.pixels_mut().iter_mut().zip(coverage) {
        let alpha = (u16::from(cov) * u16::from(color.a) / 255) as u8;
        *dst = ColorU8::from_rgba(color.r, color.g, color.b, alpha).premultiply();
    }
    Some(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_glyph_has_no_pixmap() {
        assert!(glyph_pixmap(&[], 0, 0, ColorValue::BLACK).is_none());
    }

    #[test]
    fn test_glyph_coverage_scales_alpha() {
        let color = ColorValue::rgb(255, 0, 0);
        let pixmap = glyph_pixmap(&[255, 0], 2, 1, color).unwrap();
        let pixels = pixmap.pixels();
        assert_eq!(pixels[0].alpha(), 255);
        assert_eq!(pixels[0].red(), 255);
        assert_eq!(pixels[1].alpha(), 0);
    }
}
