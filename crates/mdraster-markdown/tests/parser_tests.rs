//! Integration tests for Markdown block and inline parsing.

use mdraster_dom::{DocumentBuilder, NodeKind, bold, code, italic, line_break, text};
use mdraster_markdown::{BlockToken, BlockTokenizer, MarkdownParser, parse, parse_inline_text};

/// Helper: render a document back into `(kind, text)` pairs per block.
fn blocks(source: &str) -> Vec<(String, String)> {
    let doc = parse(source);
    doc.blocks()
        .iter()
        .map(|&id| {
            let kind = match doc.kind(id) {
                Some(NodeKind::Heading { level }) => format!("h{level}"),
                Some(kind) => kind.name().to_string(),
                None => String::new(),
            };
            (kind, doc.text_content(id))
        })
        .collect()
}

fn pair(kind: &str, text: &str) -> (String, String) {
    (kind.to_string(), text.to_string())
}

// ========== block tokenizer ==========

#[test]
fn test_classify_headings() {
    assert_eq!(
        BlockTokenizer::classify("## Section"),
        BlockToken::Heading {
            level: 2,
            text: "Section".into()
        }
    );
    assert_eq!(
        BlockTokenizer::classify("# Title ##"),
        BlockToken::Heading {
            level: 1,
            text: "Title".into()
        }
    );
    assert_eq!(
        BlockTokenizer::classify("#"),
        BlockToken::Heading {
            level: 1,
            text: String::new()
        }
    );
    // No space after the hashes: plain text.
    assert_eq!(
        BlockTokenizer::classify("#hashtag"),
        BlockToken::Text("#hashtag".into())
    );
    // Seven hashes is not a heading.
    assert_eq!(
        BlockTokenizer::classify("####### x"),
        BlockToken::Text("####### x".into())
    );
}

#[test]
fn test_classify_thematic_breaks() {
    for line in ["---", "***", "___", "- - -", "  *****  "] {
        assert_eq!(BlockTokenizer::classify(line), BlockToken::ThematicBreak, "{line}");
    }
    for line in ["--", "-*-", "--- x"] {
        assert_ne!(BlockTokenizer::classify(line), BlockToken::ThematicBreak, "{line}");
    }
}

#[test]
fn test_classify_blank() {
    assert_eq!(BlockTokenizer::classify("   \t"), BlockToken::Blank);
}

// ========== tree construction ==========

#[test]
fn test_heading_paragraph_rule() {
    assert_eq!(
        blocks("# Title\n\nSome text.\n\n---\n"),
        vec![
            pair("h1", "Title"),
            pair("paragraph", "Some text."),
            pair("horizontal-rule", "")
        ]
    );
}

#[test]
fn test_paragraph_lines_joined_with_line_breaks() {
    let doc = parse("first line\n  second line  \nthird");
    let expected = DocumentBuilder::new()
        .paragraph([
            text("first line"),
            line_break(),
            text("second line"),
            line_break(),
            text("third"),
        ])
        .build();

    assert_eq!(doc.blocks().len(), 1);
    assert_eq!(
        doc.text_content(doc.blocks()[0]),
        expected.text_content(expected.blocks()[0])
    );
}

#[test]
fn test_heading_interrupts_paragraph() {
    assert_eq!(
        blocks("para\n## Next\nmore"),
        vec![
            pair("paragraph", "para"),
            pair("h2", "Next"),
            pair("paragraph", "more")
        ]
    );
}

#[test]
fn test_inline_structure() {
    let doc = parse("a **b** *c* `d`");
    let expected = DocumentBuilder::new()
        .paragraph([
            text("a "),
            bold([text("b")]),
            text(" "),
            italic([text("c")]),
            text(" "),
            code("d"),
        ])
        .build();

    let kinds = |d: &mdraster_dom::Document| -> Vec<&'static str> {
        d.iter_all().filter_map(|id| d.kind(id)).map(NodeKind::name).collect()
    };
    assert_eq!(kinds(&doc), kinds(&expected));
    assert!(doc.validate().is_ok());
}

#[test]
fn test_cjk_document() {
    assert_eq!(
        blocks("# 标题\n\n这是一个**中文**段落。"),
        vec![pair("h1", "标题"), pair("paragraph", "这是一个中文段落。")]
    );
}

#[test]
fn test_empty_source() {
    assert!(parse("").blocks().is_empty());
    assert!(parse("\n\n   \n").blocks().is_empty());
}

#[test]
fn test_unsupported_syntax_is_text_with_issue() {
    let (doc, issues) = MarkdownParser::new("- item one\n> quoted").run_with_issues();

    assert_eq!(doc.blocks().len(), 1);
    assert_eq!(doc.text_content(doc.blocks()[0]), "- item one\n> quoted");
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].line, 1);
    assert!(issues[0].message.contains("list item"));
    assert!(issues[1].message.contains("block quote"));
}

#[test]
fn test_unmatched_delimiter_issue() {
    let (doc, issues) = MarkdownParser::new("\n`open").run_with_issues();

    assert_eq!(doc.text_content(doc.blocks()[0]), "`open");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].line, 2);
}

#[test]
fn test_parse_inline_text_ignores_block_syntax() {
    assert_eq!(
        parse_inline_text("# not a heading **b**\n  `c`"),
        vec![
            text("# not a heading "),
            bold([text("b")]),
            line_break(),
            code("c")
        ]
    );
}
