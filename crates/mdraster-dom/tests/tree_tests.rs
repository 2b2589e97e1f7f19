//! Tests for document construction, traversal and nesting validation.

use mdraster_dom::{
    Document, DocumentBuilder, NodeId, NodeKind, TreeError, bold, code, italic, line_break, text,
};

// ========== builder ==========

#[test]
fn test_builder_produces_blocks_in_order() {
    let doc = DocumentBuilder::new()
        .heading(2, [text("Title")])
        .paragraph([text("body")])
        .rule()
        .build();

    let kinds: Vec<&NodeKind> = doc.blocks().iter().filter_map(|&id| doc.kind(id)).collect();
    assert_eq!(
        kinds,
        vec![
            &NodeKind::Heading { level: 2 },
            &NodeKind::Paragraph,
            &NodeKind::HorizontalRule
        ]
    );
    assert!(doc.validate().is_ok());
}

#[test]
fn test_builder_clamps_heading_level() {
    let doc = DocumentBuilder::new()
        .heading(0, [text("a")])
        .heading(9, [text("b")])
        .build();

    assert_eq!(doc.kind(doc.blocks()[0]), Some(&NodeKind::Heading { level: 1 }));
    assert_eq!(doc.kind(doc.blocks()[1]), Some(&NodeKind::Heading { level: 6 }));
}

#[test]
fn test_builder_nests_inline_content() {
    let doc = DocumentBuilder::new()
        .paragraph([
            text("a "),
            bold([text("b "), italic([text("c")])]),
            line_break(),
            code("d"),
        ])
        .build();

    let para = doc.blocks()[0];
    assert_eq!(doc.children(para).len(), 4);
    assert_eq!(doc.text_content(para), "a b c\nd");

    let code_node = doc.children(para)[3];
    assert_eq!(doc.kind(code_node), Some(&NodeKind::InlineCode));
    assert_eq!(doc.as_text(doc.children(code_node)[0]), Some("d"));
}

#[test]
fn test_iter_all_is_document_order() {
    let doc = DocumentBuilder::new()
        .heading(1, [text("h")])
        .paragraph([bold([text("b")]), text("t")])
        .build();

    let names: Vec<&str> = doc
        .iter_all()
        .filter_map(|id| doc.kind(id))
        .map(NodeKind::name)
        .collect();
    assert_eq!(
        names,
        vec!["document", "heading", "text", "paragraph", "bold", "text", "text"]
    );
}

#[test]
fn test_parent_links() {
    let doc = DocumentBuilder::new().paragraph([bold([text("x")])]).build();
    let para = doc.blocks()[0];
    let b = doc.children(para)[0];
    let t = doc.children(b)[0];

    assert_eq!(doc.parent(t), Some(b));
    assert_eq!(doc.parent(b), Some(para));
    assert_eq!(doc.parent(para), Some(NodeId::ROOT));
    assert_eq!(doc.parent(NodeId::ROOT), None);
}

#[test]
fn test_append_document_copies_blocks() {
    let first = DocumentBuilder::new()
        .paragraph([bold([text("x")]), line_break(), text("y")])
        .build();
    let doc = DocumentBuilder::new()
        .heading(1, [text("h")])
        .append_document(&first)
        .rule()
        .build();

    assert_eq!(doc.blocks().len(), 3);
    assert_eq!(doc.text_content(doc.blocks()[1]), "x\ny");
    assert_eq!(doc.kind(doc.blocks()[2]), Some(&NodeKind::HorizontalRule));
    assert!(doc.validate().is_ok());
}

// ========== validate ==========

#[test]
fn test_empty_document_is_valid() {
    assert!(Document::new().validate().is_ok());
}

#[test]
fn test_inline_at_document_level_rejected() {
    let mut doc = Document::new();
    let t = doc.append(NodeId::ROOT, NodeKind::Text("loose".into()));

    assert_eq!(
        doc.validate(),
        Err(TreeError::InlineAtDocumentLevel {
            node: t,
            kind: "text"
        })
    );
}

#[test]
fn test_block_inside_inline_rejected() {
    let mut doc = Document::new();
    let para = doc.append(NodeId::ROOT, NodeKind::Paragraph);
    let b = doc.append(para, NodeKind::Bold);
    let h = doc.append(b, NodeKind::Heading { level: 1 });

    assert_eq!(
        doc.validate(),
        Err(TreeError::NestedBlock {
            node: h,
            kind: "heading",
            parent: b
        })
    );
}

#[test]
fn test_block_inside_block_rejected() {
    let mut doc = Document::new();
    let para = doc.append(NodeId::ROOT, NodeKind::Paragraph);
    let _ = doc.append(para, NodeKind::HorizontalRule);

    assert!(matches!(doc.validate(), Err(TreeError::NestedBlock { .. })));
}

#[test]
fn test_text_with_children_rejected() {
    let mut doc = Document::new();
    let para = doc.append(NodeId::ROOT, NodeKind::Paragraph);
    let t = doc.append(para, NodeKind::Text("a".into()));
    let _ = doc.append(t, NodeKind::Text("b".into()));

    assert!(matches!(
        doc.validate(),
        Err(TreeError::LeafWithChildren { node, .. }) if node == t
    ));
}

#[test]
fn test_invalid_heading_level_rejected() {
    let mut doc = Document::new();
    let h = doc.append(NodeId::ROOT, NodeKind::Heading { level: 7 });

    assert_eq!(
        doc.validate(),
        Err(TreeError::InvalidHeadingLevel { node: h, level: 7 })
    );
}

#[test]
fn test_shared_child_rejected() {
    let mut doc = Document::new();
    let a = doc.append(NodeId::ROOT, NodeKind::Paragraph);
    let b = doc.append(NodeId::ROOT, NodeKind::Paragraph);
    let t = doc.append(a, NodeKind::Text("shared".into()));
    doc.append_child(b, t);

    assert_eq!(doc.validate(), Err(TreeError::NotATree { node: t }));
}
