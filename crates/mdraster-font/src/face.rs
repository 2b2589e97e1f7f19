//! Font faces: the per-file source of glyph metrics and coverage.
//!
//! Every measurement and every rasterized glyph goes through one [`Face`], so
//! the advance layout accumulates is exactly the advance the renderer moves
//! its pen by.

use std::fmt;
use std::path::Path;

use fontdue::{Font, FontSettings};
use mdraster_common::script::is_cjk;

use crate::FontError;

/// Vertical metrics of a face at one size, in pixels.
///
/// `descent` is positive (distance below the baseline).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Height above the baseline.
    pub ascent: f32,
    /// Depth below the baseline.
    pub descent: f32,
    /// Extra leading recommended by the font.
    pub line_gap: f32,
}

impl LineMetrics {
    /// Ascent + descent + line gap.
    #[must_use]
    pub const fn natural_height(&self) -> f32 {
        self.ascent + self.descent + self.line_gap
    }
}

/// A rasterized glyph: an 8-bit coverage bitmap plus placement.
///
/// The bitmap's bottom edge sits `ymin` pixels above the baseline and its
/// left edge `xmin` pixels right of the pen.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Horizontal offset from the pen position.
    pub xmin: i32,
    /// Offset of the bitmap's bottom edge above the baseline.
    pub ymin: i32,
    /// Bitmap width.
    pub width: usize,
    /// Bitmap height.
    pub height: usize,
    /// Pen advance.
    pub advance: f32,
    /// Row-major coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}

/// Source of glyph metrics and coverage for one family/weight/slant.
pub trait Face: Send + Sync + fmt::Debug {
    /// Horizontal advance of `ch` at `px` pixels.
    fn advance(&self, ch: char, px: f32) -> f32;

    /// Vertical metrics at `px` pixels.
    fn line_metrics(&self, px: f32) -> LineMetrics;

    /// Rasterize `ch` at `px` pixels.
    fn rasterize(&self, ch: char, px: f32) -> Glyph;
}

/// A TrueType/OpenType face parsed by fontdue.
pub struct FontdueFace {
    name: String,
    font: Font,
}

impl FontdueFace {
    /// Parse font data. `name` labels the face in logs and errors.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::Parse`] if fontdue rejects the data.
    pub fn from_bytes(bytes: &[u8], name: &str) -> Result<Self, FontError> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|reason| {
            FontError::Parse {
                name: name.to_string(),
                reason: reason.to_string(),
            }
        })?;
        Ok(Self {
            name: name.to_string(),
            font,
        })
    }

    /// Read and parse a font file.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::Io`] if the file cannot be read, or
    /// [`FontError::Parse`] if it is not a usable font.
    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|e| FontError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(&data, &path.display().to_string())
    }

}

impl fmt::Debug for FontdueFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontdueFace")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Face for FontdueFace {
    fn advance(&self, ch: char, px: f32) -> f32 {
        // metrics() rather than rasterize(): no bitmap needed for measuring.
        self.font.metrics(ch, px).advance_width
    }

    fn line_metrics(&self, px: f32) -> LineMetrics {
        match self.font.horizontal_line_metrics(px) {
            Some(m) => LineMetrics {
                ascent: m.ascent,
                descent: -m.descent,
                line_gap: m.line_gap,
            },
            // Fonts without a hhea table.
            None => LineMetrics {
                ascent: px * 0.8,
                descent: px * 0.2,
                line_gap: 0.0,
            },
        }
    }

    fn rasterize(&self, ch: char, px: f32) -> Glyph {
        let (metrics, coverage) = self.font.rasterize(ch, px);
        Glyph {
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            width: metrics.width,
            height: metrics.height,
            advance: metrics.advance_width,
            coverage,
        }
    }
}

/// A face that needs no font file.
///
/// Non-CJK characters advance 0.6em, CJK characters 1em; ascent is 0.8em and
/// descent 0.2em. Glyphs are solid boxes. Useful wherever real fonts are
/// unavailable or would make results machine-dependent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateFace {
    /// Advance of non-CJK characters, in em.
    pub latin_advance: f32,
    /// Advance of CJK characters, in em.
    pub cjk_advance: f32,
}

impl Default for ApproximateFace {
    fn default() -> Self {
        Self {
            latin_advance: 0.6,
            cjk_advance: 1.0,
        }
    }
}

impl Face for ApproximateFace {
    fn advance(&self, ch: char, px: f32) -> f32 {
        if ch.is_control() {
            0.0
        } else if is_cjk(ch) {
            px * self.cjk_advance
        } else {
            px * self.latin_advance
        }
    }

    fn line_metrics(&self, px: f32) -> LineMetrics {
        LineMetrics {
            ascent: px * 0.8,
            descent: px * 0.2,
            line_gap: 0.0,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize(&self, ch: char, px: f32) -> Glyph {
        let advance = self.advance(ch, px);
        if ch.is_whitespace() || ch.is_control() {
            return Glyph {
                xmin: 0,
                ymin: 0,
                width: 0,
                height: 0,
                advance,
                coverage: Vec::new(),
            };
        }
        let width = ((advance * 0.8).round() as usize).max(1);
        let height = ((px * 0.7).round() as usize).max(1);
        Glyph {
            xmin: (advance * 0.1).round() as i32,
            ymin: 0,
            width,
            height,
            advance,
            coverage: vec![255; width * height],
        }
    }
}
