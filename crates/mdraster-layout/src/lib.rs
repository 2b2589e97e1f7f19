//! Layout engine for mdraster documents.
//!
//! [`layout_document`] takes a document, a resolved style for every node, a
//! canvas width and a font cache, and produces a [`LayoutTree`]: positioned
//! block boxes, wrapped lines and text fragments, plus the canvas height.
//! Layout never mutates the document and is deterministic for fixed inputs
//! and font cache contents.
//!
//! The [`paint`] module turns a layout tree into a display list.

pub mod box_model;
pub mod layout_box;
pub mod paint;

mod block;
mod inline;

use mdraster_dom::{Document, NodeId, TreeError};
use mdraster_font::{FontCache, FontError};
use mdraster_style::StyleMap;
use strum_macros::{Display, EnumString};
use thiserror::Error;

pub use box_model::{EdgeSizes, Rect};
pub use layout_box::{BlockBox, BlockContent, LayoutTree, LineBox, TextFragment};
pub use paint::{DisplayCommand, DisplayList, Painter};

/// Fatal layout errors. No layout tree is produced.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Zero width, or padding leaves no content width.
    #[error("canvas width {width} leaves no room for content")]
    InvalidWidth {
        /// The requested canvas width.
        width: u32,
    },

    /// The document violates the block/inline nesting rules.
    #[error("malformed document: {0}")]
    MalformedTree(#[from] TreeError),

    /// A node reached layout without a resolved style.
    #[error("no resolved style for node {node}")]
    MissingStyle {
        /// The unstyled node.
        node: NodeId,
    },

    /// The default font could not be loaded.
    #[error(transparent)]
    Font(#[from] FontError),
}

/// How the margins between adjacent blocks combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MarginMode {
    /// The larger of the two margins.
    #[default]
    Collapse,
    /// The sum of the two margins.
    Additive,
}

impl MarginMode {
    /// Gap between a block with bottom margin `after` and the next block
    /// with top margin `before`.
    #[must_use]
    pub const fn combine(self, after: f32, before: f32) -> f32 {
        match self {
            Self::Collapse => after.max(before),
            Self::Additive => after + before,
        }
    }
}

/// Canvas width and page geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Canvas width in pixels.
    pub width: u32,
    /// Inset of the content area.
    pub padding: EdgeSizes,
    /// Margin combination between blocks.
    pub margins: MarginMode,
}

impl LayoutOptions {
    /// `width` pixels wide, no padding, collapsing margins.
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self {
            width,
            padding: EdgeSizes::default(),
            margins: MarginMode::default(),
        }
    }

    /// Set the page padding.
    #[must_use]
    pub const fn with_padding(mut self, padding: EdgeSizes) -> Self {
        self.padding = padding;
        self
    }

    /// Set the margin mode.
    #[must_use]
    pub const fn with_margins(mut self, margins: MarginMode) -> Self {
        self.margins = margins;
        self
    }

    /// The content rectangle (height zero), or an error if there is none.
    #[allow(clippy::cast_precision_loss)]
    fn content_rect(&self) -> Result<Rect, LayoutError> {
        let width = self.width as f32 - self.padding.horizontal();
        if self.width == 0 || !width.is_finite() || width <= 0.0 {
            return Err(LayoutError::InvalidWidth { width: self.width });
        }
        Ok(Rect::new(self.padding.left, self.padding.top, width, 0.0))
    }
}

/// Lay out `doc` for a canvas described by `options`.
///
/// # Errors
///
/// Returns [`LayoutError`] when the width leaves no content area, the tree
/// is malformed, a node lacks a style, or no font can be loaded.
pub fn layout_document(
    doc: &Document,
    styles: &StyleMap,
    options: &LayoutOptions,
    fonts: &FontCache,
) -> Result<LayoutTree, LayoutError> {
    let content = options.content_rect()?;
    doc.validate()?;

    // Pass 1: measure and break lines, per block.
    let measured = doc
        .blocks()
        .iter()
        .map(|&block| block::measure_block(doc, styles, fonts, block, content))
        .collect::<Result<Vec<_>, _>>()?;

    // Pass 2: stack.
    Ok(block::position(measured, options, content))
}
