//! Document node tree for the mdraster renderer.
//!
//! This crate provides an arena-based tree of Markdown document elements.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, providing O(1) access and traversal without borrow checker
//! issues. Style maps and layout boxes refer back to nodes by [`NodeId`].
//!
//! The tree is built once (by the Markdown parser or a [`DocumentBuilder`])
//! and is read-only from then on: layout and painting only take `&Document`.
//!
//! # Shape
//!
//! ```text
//! Document
//! ├── Heading(1)
//! │   └── Text "Hello"
//! ├── Paragraph
//! │   ├── Text "plain "
//! │   ├── Bold
//! │   │   └── Text "strong"
//! │   ├── LineBreak
//! │   └── InlineCode
//! │       └── Text "x + y"
//! └── HorizontalRule
//! ```

mod builder;

pub use builder::{DocumentBuilder, Inline, bold, code, italic, line_break, text};

use thiserror::Error;

/// A type-safe index into the document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of document element kinds.
///
/// Block kinds (`Heading`, `Paragraph`, `HorizontalRule`) sit directly under
/// the document root. Inline kinds (`Bold`, `Italic`, `InlineCode`, `Text`,
/// `LineBreak`) flow inside a block.
#[derive(Debug, Clone, PartialEq, Eq, strum_macros::IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum NodeKind {
    /// The document root. Owns the block sequence.
    Document,
    /// ATX heading, level 1 through 6.
    Heading {
        /// Heading level (1 = largest).
        level: u8,
    },
    /// Paragraph of inline content.
    Paragraph,
    /// Thematic break. Has no children.
    HorizontalRule,
    /// Strong emphasis.
    Bold,
    /// Emphasis.
    Italic,
    /// Code span.
    InlineCode,
    /// A run of literal text. Has no children.
    Text(String),
    /// Hard line break inside a block. Has no children.
    LineBreak,
}

impl NodeKind {
    /// Whether this kind starts its own vertical region.
    #[must_use]
    pub const fn is_block(&self) -> bool {
        matches!(
            self,
            Self::Heading { .. } | Self::Paragraph | Self::HorizontalRule
        )
    }

    /// Whether this kind flows within a block's text.
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        matches!(
            self,
            Self::Bold | Self::Italic | Self::InlineCode | Self::Text(_) | Self::LineBreak
        )
    }

    /// Whether nodes of this kind may own children.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        !matches!(self, Self::Text(_) | Self::LineBreak | Self::HorizontalRule)
    }

    /// Short lowercase name, used in diagnostics and layout dumps.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// A single node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// What this node is.
    pub kind: NodeKind,
    /// Parent node, `None` for the root and for detached nodes.
    pub parent: Option<NodeId>,
    /// Ordered children.
    pub children: Vec<NodeId>,
}

/// Structural violations of the block/inline nesting rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// An inline node was found directly under the document root.
    #[error("inline node {node} ({kind}) at document level")]
    InlineAtDocumentLevel {
        /// Offending node.
        node: NodeId,
        /// Its kind name.
        kind: &'static str,
    },
    /// A block node was nested inside another block or an inline node.
    #[error("block node {node} ({kind}) nested inside {parent}")]
    NestedBlock {
        /// Offending node.
        node: NodeId,
        /// Its kind name.
        kind: &'static str,
        /// The node it was found under.
        parent: NodeId,
    },
    /// A leaf kind (text, line break, rule) owns children.
    #[error("leaf node {node} ({kind}) has children")]
    LeafWithChildren {
        /// Offending node.
        node: NodeId,
        /// Its kind name.
        kind: &'static str,
    },
    /// A heading level outside 1..=6.
    #[error("heading {node} has level {level}, expected 1-6")]
    InvalidHeadingLevel {
        /// Offending node.
        node: NodeId,
        /// The stored level.
        level: u8,
    },
    /// A second document node below the root.
    #[error("document node {node} below the root")]
    NestedDocument {
        /// Offending node.
        node: NodeId,
    },
    /// A node reachable twice, or a child id outside the arena.
    #[error("node {node} is reachable more than once or does not exist")]
    NotATree {
        /// Offending node.
        node: NodeId,
    },
}

/// Arena-based document tree with O(1) node access and traversal.
///
/// All nodes are stored in a contiguous vector and refer to each other by
/// index. The document node is always at index 0 ([`NodeId::ROOT`]).
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create a new tree with just the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the kind of a node, if it exists.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|n| &n.kind)
    }

    /// Number of nodes in the arena, the root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root is allocated on construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new detached node and return its ID.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// No nesting checks are made here; [`Document::validate`] reports
    /// violations before layout.
    ///
    /// # Panics
    ///
    /// Panics if either id is outside the arena.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Allocate a node of `kind` and append it under `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.alloc(kind);
        self.append_child(parent, id);
        id
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// The block sequence under the root, in document order.
    #[must_use]
    pub fn blocks(&self) -> &[NodeId] {
        self.children(NodeId::ROOT)
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of a subtree, line breaks rendered as `\n`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            match self.kind(node) {
                Some(NodeKind::Text(s)) => out.push_str(s),
                Some(NodeKind::LineBreak) => out.push('\n'),
                _ => {}
            }
        }
        out
    }

    /// Pre-order walk of the subtree rooted at `id`, `id` included.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Pre-order walk of the whole tree (document order).
    #[must_use]
    pub fn iter_all(&self) -> Descendants<'_> {
        self.descendants(NodeId::ROOT)
    }

    /// Check the block/inline nesting invariants.
    ///
    /// - Only block nodes sit directly under the root.
    /// - Block nodes own only inline nodes; inline nodes own only inline nodes.
    /// - Text, line breaks and rules own nothing.
    /// - Heading levels are 1 through 6.
    /// - Every node is reachable at most once.
    ///
    /// # Errors
    ///
    /// Returns the first [`TreeError`] found in document order.
    pub fn validate(&self) -> Result<(), TreeError> {
        let mut seen = vec![false; self.nodes.len()];
        seen[0] = true;
        let mut stack: Vec<(NodeId, NodeId)> = self
            .blocks()
            .iter()
            .rev()
            .map(|&id| (id, NodeId::ROOT))
            .collect();

        while let Some((id, parent)) = stack.pop() {
            let Some(node) = self.get(id) else {
                return Err(TreeError::NotATree { node: id });
            };
            if std::mem::replace(&mut seen[id.0], true) {
                return Err(TreeError::NotATree { node: id });
            }

            let parent_kind = self.kind(parent).unwrap_or(&NodeKind::Document);
            match &node.kind {
                NodeKind::Document => return Err(TreeError::NestedDocument { node: id }),
                kind if kind.is_block() && *parent_kind != NodeKind::Document => {
                    return Err(TreeError::NestedBlock {
                        node: id,
                        kind: kind.name(),
                        parent,
                    });
                }
                kind if kind.is_inline() && *parent_kind == NodeKind::Document => {
                    return Err(TreeError::InlineAtDocumentLevel {
                        node: id,
                        kind: kind.name(),
                    });
                }
                NodeKind::Heading { level } if !(1..=6).contains(level) => {
                    return Err(TreeError::InvalidHeadingLevel {
                        node: id,
                        level: *level,
                    });
                }
                _ => {}
            }

            if !node.kind.is_container() && !node.children.is_empty() {
                return Err(TreeError::LeafWithChildren {
                    node: id,
                    kind: node.kind.name(),
                });
            }

            stack.extend(node.children.iter().rev().map(|&child| (child, id)));
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    tree: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
