//! Block layout.
//!
//! Pass 1 measures each block on its own: text blocks are broken into lines
//! stacked from y = 0, rules get their fixed thickness. Pass 2 stacks the
//! measured blocks in document order, combining the margins between
//! neighbours, and moves each block's lines to their final position. Only
//! after pass 2 is the canvas height known.

use mdraster_dom::{Document, NodeId, NodeKind};
use mdraster_font::FontCache;
use mdraster_style::{StyleAttributes, StyleMap};

use crate::box_model::Rect;
use crate::inline::{Run, layout_lines};
use crate::layout_box::{BlockBox, BlockContent, LayoutTree};
use crate::{LayoutError, LayoutOptions};

/// A block after pass 1: content laid out relative to its own top.
#[derive(Debug)]
pub(crate) struct MeasuredBlock {
    node: NodeId,
    margin_before: f32,
    margin_after: f32,
    height: f32,
    content: BlockContent,
}

fn style_of(styles: &StyleMap, node: NodeId) -> Result<&StyleAttributes, LayoutError> {
    styles.get(&node).ok_or(LayoutError::MissingStyle { node })
}

/// Pass 1 for one block.
pub(crate) fn measure_block(
    doc: &Document,
    styles: &StyleMap,
    fonts: &FontCache,
    node: NodeId,
    content: Rect,
) -> Result<MeasuredBlock, LayoutError> {
    let style = style_of(styles, node)?;
    let (height, content) = if matches!(doc.kind(node), Some(NodeKind::HorizontalRule)) {
        (
            style.rule_thickness,
            BlockContent::Rule {
                thickness: style.rule_thickness,
                color: style.color,
            },
        )
    } else {
        let mut runs = Vec::new();
        collect_runs(doc, styles, fonts, node, &mut runs)?;
        let (lines, height) = layout_lines(&runs, content.width, content.x);
        (height, BlockContent::Lines(lines))
    };
    Ok(MeasuredBlock {
        node,
        margin_before: style.margin_before,
        margin_after: style.margin_after,
        height,
        content,
    })
}

/// Flatten the inline content under `parent` into runs, in document order.
fn collect_runs<'a>(
    doc: &'a Document,
    styles: &'a StyleMap,
    fonts: &FontCache,
    parent: NodeId,
    runs: &mut Vec<Run<'a>>,
) -> Result<(), LayoutError> {
    for &child in doc.children(parent) {
        let style = style_of(styles, child)?;
        let (text, is_break) = match doc.kind(child) {
            Some(NodeKind::Text(text)) => (text.as_str(), false),
            Some(NodeKind::LineBreak) => ("", true),
            Some(NodeKind::Bold | NodeKind::Italic | NodeKind::InlineCode) => {
                collect_runs(doc, styles, fonts, child, runs)?;
                continue;
            }
            // Rejected by Document::validate before layout starts.
            _ => continue,
        };
        let font = fonts.load_font(&style.font_family, style.font_size, style.bold, style.italic)?;
        runs.push(Run {
            node: child,
            text,
            style,
            font,
            is_break,
        });
    }
    Ok(())
}

/// Pass 2: stack measured blocks and size the canvas.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn position(blocks: Vec<MeasuredBlock>, options: &LayoutOptions, content: Rect) -> LayoutTree {
    let mut cursor = content.y;
    let mut prev_after: Option<f32> = None;
    let mut boxes = Vec::with_capacity(blocks.len());

    for block in blocks {
        let gap = match prev_after {
            None => block.margin_before,
            Some(after) => options.margins.combine(after, block.margin_before),
        };
        let top = cursor + gap;
        let mut content_box = block.content;
        if let BlockContent::Lines(lines) = &mut content_box {
            for line in lines {
                line.translate(top);
            }
        }
        boxes.push(BlockBox {
            node: block.node,
            bounds: Rect::new(content.x, top, content.width, block.height),
            margin_before: block.margin_before,
            margin_after: block.margin_after,
            content: content_box,
        });
        cursor = top + block.height;
        prev_after = Some(block.margin_after);
    }

    let bottom = cursor + prev_after.unwrap_or(0.0);
    let height = (bottom + options.padding.bottom).ceil().max(1.0) as u32;
    log::debug!(
        "layout: {} blocks, canvas {}x{height}",
        boxes.len(),
        options.width
    );
    LayoutTree {
        width: options.width,
        height,
        content: Rect::new(content.x, content.y, content.width, bottom - content.y),
        blocks: boxes,
    }
}
