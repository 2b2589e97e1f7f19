//! Integration tests for two-pass layout and painting.

use mdraster_dom::{Document, DocumentBuilder, NodeId, NodeKind, bold, code, line_break, text};
use mdraster_font::{FontCache, FontLibrary};
use mdraster_layout::{
    BlockContent, DisplayCommand, EdgeSizes, LayoutError, LayoutOptions, LayoutTree, MarginMode,
    Painter, layout_document,
};
use mdraster_style::{Theme, resolve_styles};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

fn fonts() -> FontCache {
    FontCache::new(FontLibrary::approximate())
}

fn layout_with(doc: &Document, theme: &Theme, options: &LayoutOptions) -> LayoutTree {
    let styles = resolve_styles(doc, theme);
    layout_document(doc, &styles, options, &fonts()).expect("layout succeeds")
}

fn layout(doc: &Document, theme: &Theme, width: u32) -> LayoutTree {
    layout_with(doc, theme, &LayoutOptions::new(width))
}

/// Paragraph text at `size` px, line height 1.0, no margins.
fn flat_theme(size: f32) -> Theme {
    let mut theme = Theme::light();
    theme.paragraph.font_size = Some(size);
    theme.paragraph.line_height = Some(1.0);
    theme.paragraph.margin_before = Some(0.0);
    theme.paragraph.margin_after = Some(0.0);
    theme
}

fn paragraph(content: &str, size: f32, width: u32) -> LayoutTree {
    let doc = DocumentBuilder::new().paragraph([text(content)]).build();
    layout(&doc, &flat_theme(size), width)
}

fn line_texts(tree: &LayoutTree) -> Vec<String> {
    tree.lines().map(mdraster_layout::LineBox::text).collect()
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

// ========== scenarios ==========

#[allow(clippy::cast_precision_loss)]
#[test]
fn test_single_heading() {
    let doc = DocumentBuilder::new().heading(1, [text("Hello")]).build();
    let tree = layout(&doc, &Theme::light(), 800);

    let h1_font = fonts().load_font("sans-serif", 32.0, true, false).unwrap();
    let expected = (18.0 + h1_font.line_height(1.5) + 16.0_f32).ceil();

    assert_eq!(tree.width, 800);
    assert_eq!(tree.height as f32, expected);
    assert_eq!(tree.fragments().count(), 1);
    assert_eq!(tree.fragments().next().map(|f| f.text.as_str()), Some("Hello"));
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[test]
fn test_cjk_run_wraps_per_character() {
    let content = "汉".repeat(20);
    let tree = paragraph(&content, 20.0, 150);

    let counts: Vec<usize> = tree.lines().map(mdraster_layout::LineBox::char_count).collect();
    assert_eq!(counts, vec![7, 7, 6]);
    assert_eq!(counts.len(), (20.0_f32 * 20.0 / 150.0).ceil() as usize);
    assert!(tree.lines().all(|l| l.bounds.width <= 150.0));
}

#[test]
fn test_rule_alone() {
    let doc = DocumentBuilder::new().rule().build();
    let tree = layout(&doc, &Theme::light(), 400);
    assert_eq!(tree.height, 21);

    let list = Painter::new().paint(&tree);
    assert_eq!(list.len(), 1);
    match &list.commands()[0] {
        DisplayCommand::DrawLine {
            x1, x2, y, thickness, ..
        } => {
            assert_eq!((*x1, *x2), (0.0, 400.0));
            assert_eq!(*thickness, 1.0);
            assert_close(*y, 10.5);
        }
        other => panic!("expected a line, got {other:?}"),
    }
}

#[test]
fn test_missing_family_keeps_dimensions() {
    let doc = DocumentBuilder::new()
        .heading(2, [text("Fallback")])
        .paragraph([text("body text that wraps around a bit")])
        .build();
    let direct = layout(&doc, &Theme::light(), 120);

    let mut theme = Theme::light();
    theme.global.font_family = Some("NonexistentFace".to_string());
    let styles = resolve_styles(&doc, &theme);
    let cache = fonts();
    let fallback =
        layout_document(&doc, &styles, &LayoutOptions::new(120), &cache).expect("falls back");

    assert_eq!((fallback.width, fallback.height), (direct.width, direct.height));
    assert_eq!(line_texts(&fallback), line_texts(&direct));
    assert_eq!(cache.substitutions().len(), 1);
}

// ========== line breaking ==========

#[test]
fn test_latin_breaks_at_spaces_and_trims() {
    // 6px per character at size 10.
    let tree = paragraph("aaa bbb ccc", 10.0, 50);
    assert_eq!(line_texts(&tree), vec!["aaa bbb", "ccc"]);
    assert_eq!(tree.lines().next().map(|l| l.bounds.width), Some(42.0));
}

#[test]
fn test_leading_whitespace_trimmed() {
    let tree = paragraph("   indented", 10.0, 500);
    assert_eq!(line_texts(&tree), vec!["indented"]);
    assert_eq!(tree.lines().next().map(|l| l.bounds.x), Some(0.0));
}

#[test]
fn test_overlong_word_force_broken() {
    let tree = paragraph("abcdefghij", 10.0, 25);
    assert_eq!(line_texts(&tree), vec!["abcd", "efgh", "ij"]);
}

#[test]
fn test_width_below_glyph_gives_one_char_per_line() {
    let tree = paragraph("ab中", 10.0, 3);
    assert_eq!(line_texts(&tree), vec!["a", "b", "中"]);
}

#[test]
fn test_cjk_latin_boundary_breaks_without_space() {
    // At size 10: "abc" is 18px, each CJK character 10px.
    let tree = paragraph("abc中文", 10.0, 30);
    assert_eq!(line_texts(&tree), vec!["abc中", "文"]);

    let tree = paragraph("中文abc", 10.0, 25);
    assert_eq!(line_texts(&tree), vec!["中文", "abc"]);
}

#[test]
fn test_word_across_inline_elements_stays_whole() {
    let doc = DocumentBuilder::new()
        .paragraph([text("x foo"), bold([text("bar")])])
        .build();
    let tree = layout(&doc, &flat_theme(10.0), 40);
    assert_eq!(line_texts(&tree), vec!["x", "foobar"]);

    let second = tree.lines().nth(1).expect("two lines");
    assert_eq!(second.fragments.len(), 2);
    assert_eq!(second.fragments[1].bounds.x, 18.0);
}

#[test]
fn test_hard_breaks() {
    let doc = DocumentBuilder::new()
        .paragraph([text("a"), line_break(), line_break(), text("b"), line_break()])
        .build();
    let tree = layout(&doc, &flat_theme(10.0), 100);
    assert_eq!(line_texts(&tree), vec!["a", "", "b"]);
    assert!(tree.lines().all(|l| l.bounds.height == 10.0));
}

#[test]
fn test_line_height_is_tallest_run() {
    let mut theme = flat_theme(10.0);
    theme.code.font_size = Some(30.0);
    let doc = DocumentBuilder::new()
        .paragraph([text("small "), code("big")])
        .build();
    let tree = layout(&doc, &theme, 500);

    let line = tree.lines().next().expect("one line");
    assert_eq!(line.bounds.height, 30.0);
    assert_close(line.baseline, 24.0);
}

// ========== block stacking ==========

#[test]
fn test_margins_collapse_by_default() {
    let doc = DocumentBuilder::new()
        .paragraph([text("a")])
        .paragraph([text("b")])
        .build();
    let collapsed = layout(&doc, &Theme::light(), 300);
    let additive = layout_with(
        &doc,
        &Theme::light(),
        &LayoutOptions::new(300).with_margins(MarginMode::Additive),
    );

    let gap = |t: &LayoutTree| t.blocks[1].bounds.y - t.blocks[0].bounds.bottom();
    assert_close(gap(&collapsed), 10.0);
    assert_close(gap(&additive), 18.0);
    assert_close(collapsed.blocks[0].bounds.y, 8.0);
    assert!(additive.height > collapsed.height);
}

#[test]
fn test_empty_block_reserves_margins() {
    let doc = DocumentBuilder::new()
        .paragraph([text("   ")])
        .heading(3, [])
        .build();
    let tree = layout(&doc, &Theme::light(), 300);

    assert!(tree.blocks.iter().all(|b| b.bounds.height == 0.0));
    assert_eq!(tree.lines().count(), 0);
    // 8 before, max(10, 14) between, 12 after.
    assert_eq!(tree.height, 34);
}

#[test]
fn test_empty_document_gives_minimal_canvas() {
    let doc = Document::new();
    let tree = layout(&doc, &Theme::light(), 300);
    assert_eq!((tree.width, tree.height), (300, 1));

    let padded = layout_with(
        &doc,
        &Theme::light(),
        &LayoutOptions::new(300).with_padding(EdgeSizes::uniform(20.0)),
    );
    assert_eq!(padded.height, 40);
}

#[test]
fn test_padding_insets_content() {
    let doc = DocumentBuilder::new().paragraph([text("word")]).build();
    let tree = layout_with(
        &doc,
        &flat_theme(10.0),
        &LayoutOptions::new(100).with_padding(EdgeSizes::uniform(5.0)),
    );
    let line = tree.lines().next().expect("one line");
    assert_eq!((line.bounds.x, line.bounds.y), (5.0, 5.0));
    assert_eq!(tree.content.width, 90.0);
    assert_eq!(tree.height, 20);
}

#[allow(clippy::cast_precision_loss)]
#[test]
fn test_height_covers_block_contents() {
    let doc = DocumentBuilder::new()
        .heading(1, [text("Title")])
        .paragraph([text("some words that wrap across several lines of text")])
        .rule()
        .paragraph([text("end")])
        .build();
    let tree = layout(&doc, &Theme::light(), 120);
    let sum: f32 = tree.blocks.iter().map(|b| b.bounds.height).sum();
    assert!(tree.height as f32 >= sum);
    assert!(matches!(tree.blocks[2].content, BlockContent::Rule { .. }));
}

#[test]
fn test_layout_is_deterministic() {
    let doc = DocumentBuilder::new()
        .heading(2, [text("混合 mixed")])
        .paragraph([text("这是一段中文 with English words 和标点。")])
        .build();
    let a = layout(&doc, &Theme::cjk_friendly(), 160);
    let b = layout(&doc, &Theme::cjk_friendly(), 160);
    assert_eq!(a.dump(), b.dump());
}

// ========== errors ==========

#[test]
fn test_invalid_width() {
    let doc = DocumentBuilder::new().paragraph([text("x")]).build();
    let styles = resolve_styles(&doc, &Theme::light());
    let cache = fonts();

    assert!(matches!(
        layout_document(&doc, &styles, &LayoutOptions::new(0), &cache),
        Err(LayoutError::InvalidWidth { width: 0 })
    ));
    let padded = LayoutOptions::new(30).with_padding(EdgeSizes::uniform(20.0));
    assert!(matches!(
        layout_document(&doc, &styles, &padded, &cache),
        Err(LayoutError::InvalidWidth { width: 30 })
    ));
}

#[test]
fn test_malformed_tree_rejected() {
    let mut doc = Document::new();
    let _ = doc.append(NodeId::ROOT, NodeKind::Text("loose".into()));
    let styles = resolve_styles(&doc, &Theme::light());

    assert!(matches!(
        layout_document(&doc, &styles, &LayoutOptions::new(100), &fonts()),
        Err(LayoutError::MalformedTree(_))
    ));
}

#[test]
fn test_missing_style_rejected() {
    let doc = DocumentBuilder::new().paragraph([text("x")]).build();
    let text_node = doc.children(doc.blocks()[0])[0];
    let mut styles = resolve_styles(&doc, &Theme::light());
    let _ = styles.remove(&text_node);

    assert!(matches!(
        layout_document(&doc, &styles, &LayoutOptions::new(100), &fonts()),
        Err(LayoutError::MissingStyle { node }) if node == text_node
    ));
}

// ========== painting ==========

#[test]
fn test_code_background_painted_before_text() {
    let doc = DocumentBuilder::new()
        .paragraph([text("run "), code("x")])
        .build();
    let tree = layout(&doc, &Theme::light(), 300);
    let list = Painter::new().paint(&tree);

    let kinds: Vec<&str> = list
        .commands()
        .iter()
        .map(|c| match c {
            DisplayCommand::FillRect { .. } => "rect",
            DisplayCommand::DrawText { .. } => "text",
            DisplayCommand::DrawLine { .. } => "line",
        })
        .collect();
    assert_eq!(kinds, vec!["text", "rect", "text"]);
}

#[test]
fn test_one_text_command_per_fragment() {
    let doc = DocumentBuilder::new()
        .paragraph([text("one two three four five six seven")])
        .build();
    let tree = layout(&doc, &Theme::light(), 90);
    let list = Painter::new().paint(&tree);
    assert_eq!(list.len(), tree.fragments().count());
    assert!(tree.lines().count() > 1);
}

// ========== properties ==========

const ALPHABET: &[char] = &['a', 'b', 'W', ' ', '中', '文', '。', 'x', ' ', 'é'];

#[allow(clippy::cast_precision_loss)]
#[quickcheck]
fn prop_lines_fit_width(seed: Vec<u8>, width: u16) -> bool {
    let width = u32::from(width % 400) + 1;
    let content: String = seed
        .iter()
        .map(|b| ALPHABET[usize::from(*b) % ALPHABET.len()])
        .collect();
    let tree = paragraph(&content, 14.0, width);
    tree.lines()
        .all(|l| l.bounds.width <= width as f32 || l.char_count() == 1)
}

#[quickcheck]
fn prop_latin_words_never_split(lengths: Vec<u8>, width: u16) -> TestResult {
    if lengths.is_empty() {
        return TestResult::discard();
    }
    // Words of 1-8 letters are at most 48px at size 10.
    let width = u32::from(width % 300) + 50;
    let words: Vec<String> = lengths
        .iter()
        .enumerate()
        .map(|(i, len)| {
            let letter = char::from(b'a' + u8::try_from(i % 26).unwrap());
            letter.to_string().repeat(usize::from(len % 8) + 1)
        })
        .collect();
    let tree = paragraph(&words.join(" "), 10.0, width);

    let laid_out: Vec<String> = tree
        .lines()
        .flat_map(|l| {
            l.text()
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();
    TestResult::from_bool(laid_out == words)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
#[quickcheck]
fn prop_uniform_cjk_line_count(count: u8, per_line: u8) -> TestResult {
    let count = usize::from(count % 60) + 1;
    let per_line = u32::from(per_line % 10) + 1;
    let width = per_line * 20;
    if count as u32 * 20 <= width {
        return TestResult::discard();
    }
    let tree = paragraph(&"字".repeat(count), 20.0, width);
    let expected = (count as f32 * 20.0 / width as f32).ceil() as usize;
    TestResult::from_bool(
        tree.lines().count() == expected && tree.lines().all(|l| l.bounds.width <= width as f32),
    )
}

#[quickcheck]
fn prop_layout_deterministic(seed: Vec<u8>, width: u16) -> bool {
    let width = u32::from(width % 400) + 1;
    let content: String = seed
        .iter()
        .map(|b| ALPHABET[usize::from(*b) % ALPHABET.len()])
        .collect();
    paragraph(&content, 14.0, width).dump() == paragraph(&content, 14.0, width).dump()
}
