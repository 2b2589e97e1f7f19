//! Font metrics provider.
//!
//! Fonts are described by a [`FontLibrary`] (registered families plus
//! directories to search) and loaded on demand through a [`FontCache`], which
//! hands out shared [`FontHandle`]s keyed by [`FontKey`]. A handle answers
//! every measurement question layout asks and rasterizes glyphs for the
//! renderer, so the two always agree on advances.
//!
//! ```
//! use mdraster_font::{FontCache, FontLibrary};
//!
//! let cache = FontCache::new(FontLibrary::approximate());
//! let font = cache.load_font("sans-serif", 20.0, false, false)?;
//! assert_eq!(font.measure("中文").width, 40.0);
//! # Ok::<(), mdraster_font::FontError>(())
//! ```

pub mod cache;
pub mod face;
pub mod library;

use std::path::PathBuf;

use thiserror::Error;

pub use cache::{FontCache, FontHandle, FontKey, Substitution, TextMetrics};
pub use face::{ApproximateFace, Face, FontdueFace, Glyph, LineMetrics};
pub use library::{FontLibrary, FontSource};

/// Errors produced by font loading.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FontError {
    /// Neither the requested family nor the default family could be loaded.
    /// No text can be measured or drawn.
    #[error("default font family '{family}' is not available")]
    DefaultFontUnavailable {
        /// The default family that failed.
        family: String,
    },

    /// A font file could not be read.
    #[error("failed to read font '{}': {reason}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        reason: String,
    },

    /// Font data could not be parsed.
    #[error("failed to parse font '{name}': {reason}")]
    Parse {
        /// File name or label of the data.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// A size that is zero, negative or not finite.
    #[error("invalid font size {size}")]
    InvalidSize {
        /// The rejected size.
        size: f32,
    },
}
