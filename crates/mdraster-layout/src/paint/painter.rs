//! Painter: walks the layout tree and emits drawing commands.

use crate::layout_box::{BlockBox, BlockContent, LayoutTree, LineBox};

use super::{DisplayCommand, DisplayList};

/// Generates a display list from a layout tree.
///
/// Blocks are painted in document order. Per text fragment: its background
/// (if styled) then exactly one text command. Per rule: exactly one line
/// spanning the block's width at its vertical midpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct Painter;

impl Painter {
    /// Create a painter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Paint a layout tree and return the display list.
    #[must_use]
    pub fn paint(&self, tree: &LayoutTree) -> DisplayList {
        let mut list = DisplayList::new();
        for block in &tree.blocks {
            Self::paint_block(block, &mut list);
        }
        list
    }

    fn paint_block(block: &BlockBox, list: &mut DisplayList) {
        match &block.content {
            BlockContent::Rule { thickness, color } => {
                list.push(DisplayCommand::DrawLine {
                    x1: block.bounds.x,
                    x2: block.bounds.right(),
                    y: block.bounds.y + block.bounds.height / 2.0,
                    thickness: *thickness,
                    color: *color,
                });
            }
            BlockContent::Lines(lines) => {
                for line in lines {
                    Self::paint_line(line, list);
                }
            }
        }
    }

    fn paint_line(line: &LineBox, list: &mut DisplayList) {
        for frag in &line.fragments {
            if let Some(background) = frag.background.filter(|c| !c.is_transparent()) {
                list.push(DisplayCommand::FillRect {
                    x: frag.bounds.x,
                    y: frag.bounds.y,
                    width: frag.bounds.width,
                    height: frag.bounds.height,
                    color: background,
                });
            }
            list.push(DisplayCommand::DrawText {
                x: frag.bounds.x,
                y: line.baseline,
                text: frag.text.clone(),
                font: frag.font.clone(),
                color: frag.color,
            });
        }
    }
}
