//! Programmatic document construction.
//!
//! ```
//! use mdraster_dom::{DocumentBuilder, bold, code, text};
//!
//! let doc = DocumentBuilder::new()
//!     .heading(1, [text("Hello")])
//!     .paragraph([text("some "), bold([text("strong")]), text(" and "), code("code")])
//!     .rule()
//!     .build();
//! assert_eq!(doc.blocks().len(), 3);
//! ```

use crate::{Document, NodeId, NodeKind};

/// Inline content description, appended to a block by [`DocumentBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Literal text.
    Text(String),
    /// Strong emphasis around nested content.
    Bold(Vec<Inline>),
    /// Emphasis around nested content.
    Italic(Vec<Inline>),
    /// Code span with literal content.
    Code(String),
    /// Hard line break.
    LineBreak,
}

/// Literal text.
pub fn text(s: impl Into<String>) -> Inline {
    Inline::Text(s.into())
}

/// Strong emphasis.
pub fn bold(content: impl IntoIterator<Item = Inline>) -> Inline {
    Inline::Bold(content.into_iter().collect())
}

/// Emphasis.
pub fn italic(content: impl IntoIterator<Item = Inline>) -> Inline {
    Inline::Italic(content.into_iter().collect())
}

/// Code span.
pub fn code(s: impl Into<String>) -> Inline {
    Inline::Code(s.into())
}

/// Hard line break.
#[must_use]
pub const fn line_break() -> Inline {
    Inline::LineBreak
}

/// Builder that appends blocks to a fresh [`Document`] in order.
///
/// Each call returns the builder, so a document reads top to bottom the way
/// it renders. The produced tree always satisfies [`Document::validate`].
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    doc: Document,
}

impl DocumentBuilder {
    /// Start an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a heading. The level is clamped to 1..=6.
    #[must_use]
    pub fn heading(mut self, level: u8, content: impl IntoIterator<Item = Inline>) -> Self {
        let id = self.doc.append(
            NodeId::ROOT,
            NodeKind::Heading {
                level: level.clamp(1, 6),
            },
        );
        self.append_inlines(id, content);
        self
    }

    /// Append a paragraph.
    #[must_use]
    pub fn paragraph(mut self, content: impl IntoIterator<Item = Inline>) -> Self {
        let id = self.doc.append(NodeId::ROOT, NodeKind::Paragraph);
        self.append_inlines(id, content);
        self
    }

    /// Append a horizontal rule.
    #[must_use]
    pub fn rule(mut self) -> Self {
        let _ = self.doc.append(NodeId::ROOT, NodeKind::HorizontalRule);
        self
    }

    /// Append copies of every block of `other`, in order.
    #[must_use]
    pub fn append_document(mut self, other: &Document) -> Self {
        for &block in other.blocks() {
            self.copy_subtree(other, block, NodeId::ROOT);
        }
        self
    }

    /// Number of blocks appended so far.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.doc.blocks().len()
    }

    /// Finish and return the document.
    #[must_use]
    pub fn build(self) -> Document {
        self.doc
    }

    fn copy_subtree(&mut self, other: &Document, id: NodeId, parent: NodeId) {
        let Some(kind) = other.kind(id) else {
            return;
        };
        let copy = self.doc.append(parent, kind.clone());
        for &child in other.children(id) {
            self.copy_subtree(other, child, copy);
        }
    }

    fn append_inlines(&mut self, parent: NodeId, content: impl IntoIterator<Item = Inline>) {
        for inline in content {
            match inline {
                Inline::Text(s) => {
                    let _ = self.doc.append(parent, NodeKind::Text(s));
                }
                Inline::Bold(children) => {
                    let id = self.doc.append(parent, NodeKind::Bold);
                    self.append_inlines(id, children);
                }
                Inline::Italic(children) => {
                    let id = self.doc.append(parent, NodeKind::Italic);
                    self.append_inlines(id, children);
                }
                Inline::Code(s) => {
                    let id = self.doc.append(parent, NodeKind::InlineCode);
                    let _ = self.doc.append(id, NodeKind::Text(s));
                }
                Inline::LineBreak => {
                    let _ = self.doc.append(parent, NodeKind::LineBreak);
                }
            }
        }
    }
}
