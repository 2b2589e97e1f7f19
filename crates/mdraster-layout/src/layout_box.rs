//! The positioned box tree.
//!
//! Blocks mirror the document's block children in order. A text block holds
//! wrapped lines, and each line holds the text fragments the renderer paints
//! with one draw call apiece. The tree is produced once by layout and only
//! read afterwards.

use mdraster_dom::NodeId;
use mdraster_font::FontHandle;
use mdraster_style::ColorValue;

use crate::box_model::Rect;

/// Result of laying out a document.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    /// Canvas width, as requested.
    pub width: u32,
    /// Canvas height, as computed.
    pub height: u32,
    /// Content area (canvas minus page padding, full computed height).
    pub content: Rect,
    /// Blocks in document order.
    pub blocks: Vec<BlockBox>,
}

impl LayoutTree {
    /// Every line of every text block, in document order.
    pub fn lines(&self) -> impl Iterator<Item = &LineBox> {
        self.blocks.iter().flat_map(BlockBox::lines)
    }

    /// Every text fragment, in document order.
    pub fn fragments(&self) -> impl Iterator<Item = &TextFragment> {
        self.lines().flat_map(|line| line.fragments.iter())
    }

    /// Layout as indented text, one box per line.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = format!("canvas {}x{}\n", self.width, self.height);
        for block in &self.blocks {
            let b = block.bounds;
            out.push_str(&format!(
                "  block {} @ ({}, {}) {}x{} margins {}/{}\n",
                block.node, b.x, b.y, b.width, b.height, block.margin_before, block.margin_after
            ));
            match &block.content {
                BlockContent::Rule { thickness, color } => {
                    out.push_str(&format!("    rule {thickness}px {color}\n"));
                }
                BlockContent::Lines(lines) => {
                    for line in lines {
                        out.push_str(&format!(
                            "    line y={} h={} baseline={} w={}\n",
                            line.bounds.y, line.bounds.height, line.baseline, line.bounds.width
                        ));
                        for frag in &line.fragments {
                            out.push_str(&format!(
                                "      text {} x={} w={} {:?} [{}]\n",
                                frag.node,
                                frag.bounds.x,
                                frag.bounds.width,
                                frag.text,
                                frag.font.key()
                            ));
                        }
                    }
                }
            }
        }
        out
    }
}

/// One block, positioned.
#[derive(Debug, Clone)]
pub struct BlockBox {
    /// The heading, paragraph or rule this box is for.
    pub node: NodeId,
    /// Content box, excluding margins.
    pub bounds: Rect,
    /// Margin above, as styled.
    pub margin_before: f32,
    /// Margin below, as styled.
    pub margin_after: f32,
    /// What the box holds.
    pub content: BlockContent,
}

impl BlockBox {
    /// Lines of a text block; empty for a rule.
    #[must_use]
    pub fn lines(&self) -> &[LineBox] {
        match &self.content {
            BlockContent::Lines(lines) => lines,
            BlockContent::Rule { .. } => &[],
        }
    }
}

/// Contents of a block box.
#[derive(Debug, Clone)]
pub enum BlockContent {
    /// Wrapped lines of a heading or paragraph.
    Lines(Vec<LineBox>),
    /// A horizontal rule filling the box.
    Rule {
        /// Stroke thickness.
        thickness: f32,
        /// Stroke color.
        color: ColorValue,
    },
}

/// One wrapped line.
#[derive(Debug, Clone)]
pub struct LineBox {
    /// Line rectangle; width is the trimmed text width.
    pub bounds: Rect,
    /// Absolute y of the baseline.
    pub baseline: f32,
    /// Fragments left to right.
    pub fragments: Vec<TextFragment>,
}

impl LineBox {
    /// Number of characters on the line.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.fragments.iter().map(|f| f.text.chars().count()).sum()
    }

    /// Concatenated text of the line.
    #[must_use]
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    pub(crate) fn translate(&mut self, dy: f32) {
        self.bounds = self.bounds.translated(dy);
        self.baseline += dy;
        for frag in &mut self.fragments {
            frag.bounds = frag.bounds.translated(dy);
        }
    }
}

/// A piece of one text node placed on one line.
#[derive(Debug, Clone)]
pub struct TextFragment {
    /// Source text node.
    pub node: NodeId,
    /// Text to draw.
    pub text: String,
    /// Glyph box: advance width by ascent + descent, top at baseline - ascent.
    pub bounds: Rect,
    /// Font to draw with.
    pub font: FontHandle,
    /// Text color.
    pub color: ColorValue,
    /// Background painted behind the glyph box.
    pub background: Option<ColorValue>,
}
