//! Per-node style resolution.
//!
//! Blocks start from the theme's `global` rule and apply their own rule.
//! Inline elements start from their parent's computed style, keeping only
//! the inherited properties (family, size, weight, slant, color, line
//! height), then apply their own rule. Text and line breaks take their
//! parent's inherited properties unchanged. Margins and rule thickness never
//! inherit; background reaches only the text directly inside an element, so
//! a code span paints behind its own content.

use std::collections::HashMap;

use mdraster_dom::{Document, NodeId, NodeKind};

use crate::color::ColorValue;
use crate::theme::{StyleRule, Theme};

/// Fully resolved style of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleAttributes {
    /// Font family name.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Text or rule color.
    pub color: ColorValue,
    /// Background behind inline text, if any.
    pub background: Option<ColorValue>,
    /// Line-height multiplier applied to the font's natural line height.
    pub line_height: f32,
    /// Space above a block.
    pub margin_before: f32,
    /// Space below a block.
    pub margin_after: f32,
    /// Stroke thickness of a horizontal rule.
    pub rule_thickness: f32,
}

impl Default for StyleAttributes {
    /// Initial values, used where the theme sets nothing.
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 16.0,
            bold: false,
            italic: false,
            color: ColorValue::BLACK,
            background: None,
            line_height: 1.5,
            margin_before: 0.0,
            margin_after: 0.0,
            rule_thickness: 1.0,
        }
    }
}

impl StyleAttributes {
    /// Inherited properties of `self`, everything else at initial values.
    #[must_use]
    pub fn inherit(&self) -> Self {
        Self {
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            bold: self.bold,
            italic: self.italic,
            color: self.color,
            line_height: self.line_height,
            ..Self::default()
        }
    }

    /// Apply every declaration set in `rule`.
    pub fn apply(&mut self, rule: &StyleRule) {
        if let Some(family) = &rule.font_family {
            self.font_family.clone_from(family);
        }
        if let Some(size) = rule.font_size {
            self.font_size = size;
        }
        if let Some(bold) = rule.bold {
            self.bold = bold;
        }
        if let Some(italic) = rule.italic {
            self.italic = italic;
        }
        if let Some(color) = rule.color {
            self.color = color;
        }
        if rule.background.is_some() {
            self.background = rule.background;
        }
        if let Some(line_height) = rule.line_height {
            self.line_height = line_height;
        }
        if let Some(margin) = rule.margin_before {
            self.margin_before = margin;
        }
        if let Some(margin) = rule.margin_after {
            self.margin_after = margin;
        }
        if let Some(thickness) = rule.rule_thickness {
            self.rule_thickness = thickness;
        }
    }
}

/// Resolved styles keyed by node.
pub type StyleMap = HashMap<NodeId, StyleAttributes>;

/// Resolve a style for every node reachable from the root.
///
/// The root itself gets the `global` style, which layout ignores.
#[must_use]
pub fn resolve_styles(doc: &Document, theme: &Theme) -> StyleMap {
    let mut root = StyleAttributes::default();
    root.apply(&theme.global);

    let mut styles = StyleMap::with_capacity(doc.len());
    for &block in doc.blocks() {
        resolve_node(doc, theme, block, &root, &mut styles);
    }
    let _ = styles.insert(NodeId::ROOT, root);
    styles
}

fn resolve_node(
    doc: &Document,
    theme: &Theme,
    id: NodeId,
    parent: &StyleAttributes,
    styles: &mut StyleMap,
) {
    let Some(kind) = doc.kind(id) else {
        return;
    };
    let rule = match kind {
        NodeKind::Heading { level } => Some(theme.heading(*level)),
        NodeKind::Paragraph => Some(&theme.paragraph),
        NodeKind::HorizontalRule => Some(&theme.hr),
        NodeKind::Bold => Some(&theme.bold),
        NodeKind::Italic => Some(&theme.italic),
        NodeKind::InlineCode => Some(&theme.code),
        NodeKind::Document | NodeKind::Text(_) | NodeKind::LineBreak => None,
    };

    let mut computed = parent.inherit();
    if matches!(kind, NodeKind::Text(_)) {
        computed.background = parent.background;
    }
    if let Some(rule) = rule {
        computed.apply(rule);
    }

    for &child in doc.children(id) {
        resolve_node(doc, theme, child, &computed, styles);
    }
    let _ = styles.insert(id, computed);
}
