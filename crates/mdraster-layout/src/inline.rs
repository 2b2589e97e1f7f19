//! Inline layout: runs, break opportunities and greedy line filling.
//!
//! A block's inline content is flattened into runs, one per text node (or
//! hard break). Runs are cut into atoms (a whitespace span, a single CJK
//! character, or a word of anything else) and atoms are grouped into
//! segments, the units between two break opportunities. A line takes
//! segments while they fit; a segment wider than a whole line is broken
//! between characters.
//!
//! Break opportunities:
//! - after whitespace,
//! - before and after every CJK character, which also breaks a CJK/Latin
//!   boundary without whitespace,
//! - never inside a word, even one spanning several inline elements.

use mdraster_common::script::ScriptClass;
use mdraster_dom::NodeId;
use mdraster_font::FontHandle;
use mdraster_style::StyleAttributes;

use crate::box_model::Rect;
use crate::layout_box::{LineBox, TextFragment};

/// A text node (or hard break) with its resolved style and font.
#[derive(Debug, Clone)]
pub(crate) struct Run<'a> {
    pub node: NodeId,
    pub text: &'a str,
    pub style: &'a StyleAttributes,
    pub font: FontHandle,
    pub is_break: bool,
}

impl Run<'_> {
    fn line_height(&self) -> f32 {
        self.font.line_height(self.style.line_height)
    }

    /// Distance from the line top to the baseline when this run alone sets
    /// the line: half-leading plus ascent.
    fn baseline_offset(&self) -> f32 {
        let m = self.font.line_metrics();
        let half_leading = (self.line_height() - (m.ascent + m.descent)) / 2.0;
        half_leading + m.ascent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AtomKind {
    Space,
    Cjk,
    Word,
    Break,
}

#[derive(Debug, Clone, Copy)]
struct Atom {
    run: usize,
    start: usize,
    end: usize,
    width: f32,
    kind: AtomKind,
}

fn atomize(runs: &[Run<'_>]) -> Vec<Atom> {
    let mut atoms: Vec<Atom> = Vec::new();
    for (index, run) in runs.iter().enumerate() {
        if run.is_break {
            atoms.push(Atom {
                run: index,
                start: 0,
                end: 0,
                width: 0.0,
                kind: AtomKind::Break,
            });
            continue;
        }
        let first = atoms.len();
        for (offset, ch) in run.text.char_indices() {
            let kind = match ScriptClass::of(ch) {
                ScriptClass::Space => AtomKind::Space,
                ScriptClass::Cjk => AtomKind::Cjk,
                ScriptClass::Other => AtomKind::Word,
            };
            let width = run.font.char_width(ch);
            let end = offset + ch.len_utf8();
            // Spaces and words extend the previous atom of this run.
            if let Some(last) = atoms[first..].last_mut()
                && last.kind == kind
                && kind != AtomKind::Cjk
            {
                last.end = end;
                last.width += width;
                continue;
            }
            atoms.push(Atom {
                run: index,
                start: offset,
                end,
                width,
                kind,
            });
        }
    }
    atoms
}

/// Whether a line may break between atoms of kind `prev` and `cur`.
fn breaks_before(prev: AtomKind, cur: AtomKind) -> bool {
    match (prev, cur) {
        (AtomKind::Break, _) | (_, AtomKind::Break) => true,
        // Whitespace hangs at the end of the segment before it.
        (_, AtomKind::Space) => false,
        (AtomKind::Space | AtomKind::Cjk, _) | (_, AtomKind::Cjk) => true,
        (AtomKind::Word, AtomKind::Word) => false,
    }
}

fn segments(atoms: &[Atom]) -> Vec<&[Atom]> {
    let mut out = Vec::new();
    let mut start = 0;
    for j in 1..atoms.len() {
        if breaks_before(atoms[j - 1].kind, atoms[j].kind) {
            out.push(&atoms[start..j]);
            start = j;
        }
    }
    if start < atoms.len() {
        out.push(&atoms[start..]);
    }
    out
}

fn trim_leading_spaces(seg: &[Atom]) -> &[Atom] {
    let skip = seg.iter().take_while(|a| a.kind == AtomKind::Space).count();
    &seg[skip..]
}

#[derive(Debug, Clone, Copy)]
struct Piece {
    run: usize,
    start: usize,
    end: usize,
    width: f32,
    space: bool,
}

/// A filled line before positioning.
#[derive(Debug, Default)]
struct PendingLine {
    pieces: Vec<Piece>,
    /// Sum of piece widths, accumulated left to right.
    width: f32,
    /// Hard break that ended the line.
    break_run: Option<usize>,
}

impl PendingLine {
    fn push(&mut self, piece: Piece) {
        self.width += piece.width;
        self.pieces.push(piece);
    }
}

struct LineFiller<'r, 'a> {
    runs: &'r [Run<'a>],
    available: f32,
    current: PendingLine,
    lines: Vec<PendingLine>,
}

impl LineFiller<'_, '_> {
    fn push_segment(&mut self, seg: &[Atom]) {
        if let [
            Atom {
                kind: AtomKind::Break,
                run,
                ..
            },
        ] = seg
        {
            self.current.break_run = Some(*run);
            self.finish_line();
            return;
        }

        // Leading whitespace on a line is dropped.
        let seg = if self.current.pieces.is_empty() {
            trim_leading_spaces(seg)
        } else {
            seg
        };
        if seg.is_empty() {
            return;
        }

        if self.fits(self.current.width, seg) {
            self.append(seg);
            return;
        }
        if !self.current.pieces.is_empty() {
            self.finish_line();
            if self.fits(0.0, seg) {
                self.append(seg);
                return;
            }
        }
        self.force_break(seg);
    }

    /// Whether `seg`, trailing whitespace excluded, fits after `width`.
    /// Accumulates exactly as [`PendingLine::push`] does.
    fn fits(&self, width: f32, seg: &[Atom]) -> bool {
        let mut w = width;
        for atom in seg.iter().filter(|a| a.kind != AtomKind::Space) {
            w += atom.width;
        }
        w <= self.available
    }

    fn append(&mut self, seg: &[Atom]) {
        for atom in seg {
            self.current.push(Piece {
                run: atom.run,
                start: atom.start,
                end: atom.end,
                width: atom.width,
                space: atom.kind == AtomKind::Space,
            });
        }
    }

    /// Place a segment wider than a line one character at a time. Every
    /// line gets at least one character, so this always terminates.
    fn force_break(&mut self, seg: &[Atom]) {
        for atom in seg {
            if atom.kind == AtomKind::Space {
                self.append(std::slice::from_ref(atom));
                continue;
            }
            let run = &self.runs[atom.run];
            for (offset, ch) in run.text[atom.start..atom.end].char_indices() {
                let width = run.font.char_width(ch);
                if !self.current.pieces.is_empty() && self.current.width + width > self.available {
                    self.finish_line();
                }
                let start = atom.start + offset;
                self.current.push(Piece {
                    run: atom.run,
                    start,
                    end: start + ch.len_utf8(),
                    width,
                    space: false,
                });
            }
        }
    }

    /// Close the current line. Trailing whitespace is dropped; a line left
    /// with nothing is kept only if a hard break ended it.
    fn finish_line(&mut self) {
        let mut line = std::mem::take(&mut self.current);
        while line.pieces.last().is_some_and(|p| p.space) {
            let _ = line.pieces.pop();
        }
        if line.pieces.is_empty() && line.break_run.is_none() {
            return;
        }
        line.width = line.pieces.iter().fold(0.0, |w, p| w + p.width);
        self.lines.push(line);
    }
}

/// Break `runs` into lines no wider than `available` (except lines of a
/// single character) and position them from `(left, 0)` downward.
///
/// Returns the lines and their total height.
pub(crate) fn layout_lines(runs: &[Run<'_>], available: f32, left: f32) -> (Vec<LineBox>, f32) {
    let atoms = atomize(runs);
    let mut filler = LineFiller {
        runs,
        available,
        current: PendingLine::default(),
        lines: Vec::new(),
    };
    for seg in segments(&atoms) {
        filler.push_segment(seg);
    }
    filler.finish_line();

    let mut y = 0.0;
    let mut boxes = Vec::with_capacity(filler.lines.len());
    for line in filler.lines {
        let line_box = build_line(runs, &line, left, y);
        y += line_box.bounds.height;
        boxes.push(line_box);
    }
    (boxes, y)
}

fn build_line(runs: &[Run<'_>], line: &PendingLine, left: f32, top: f32) -> LineBox {
    let contributing = line
        .pieces
        .iter()
        .map(|p| &runs[p.run])
        .chain(line.break_run.map(|r| &runs[r]));
    let (height, baseline) = contributing.fold((0.0_f32, 0.0_f32), |(h, b), run| {
        (h.max(run.line_height()), b.max(run.baseline_offset()))
    });
    let baseline = top + baseline;

    let mut fragments: Vec<TextFragment> = Vec::new();
    let mut x = left;
    let mut last: Option<(usize, usize)> = None;
    for piece in &line.pieces {
        let run = &runs[piece.run];
        let text = &run.text[piece.start..piece.end];
        match fragments.last_mut() {
            // Contiguous text of the same node extends the fragment.
            Some(frag) if last == Some((piece.run, piece.start)) => {
                frag.text.push_str(text);
                frag.bounds.width += piece.width;
            }
            _ => {
                let m = run.font.line_metrics();
                fragments.push(TextFragment {
                    node: run.node,
                    text: text.to_string(),
                    bounds: Rect::new(x, baseline - m.ascent, piece.width, m.ascent + m.descent),
                    font: run.font.clone(),
                    color: run.style.color,
                    background: run.style.background,
                });
            }
        }
        last = Some((piece.run, piece.end));
        x += piece.width;
    }

    LineBox {
        bounds: Rect::new(left, top, line.width, height),
        baseline,
        fragments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdraster_font::{FontCache, FontLibrary};

    fn run<'a>(cache: &FontCache, style: &'a StyleAttributes, text: &'a str) -> Run<'a> {
        Run {
            node: NodeId(1),
            text,
            style,
            font: cache.load_font("sans-serif", 10.0, false, false).unwrap(),
            is_break: false,
        }
    }

    fn kinds(runs: &[Run<'_>]) -> Vec<AtomKind> {
        atomize(runs).iter().map(|a| a.kind).collect()
    }

    #[test]
    fn test_atoms() {
        let cache = FontCache::new(FontLibrary::approximate());
        let style = StyleAttributes::default();
        let runs = [run(&cache, &style, "ab  中文x")];
        assert_eq!(
            kinds(&runs),
            vec![AtomKind::Word, AtomKind::Space, AtomKind::Cjk, AtomKind::Cjk, AtomKind::Word]
        );
        let atoms = atomize(&runs);
        assert_eq!(atoms[1].width, 12.0);
        assert_eq!((atoms[2].start, atoms[2].end), (4, 7));
    }

    #[test]
    fn test_segments_break_rules() {
        let cache = FontCache::new(FontLibrary::approximate());
        let style = StyleAttributes::default();
        let runs = [run(&cache, &style, "foo"), run(&cache, &style, "bar 中文baz")];
        let atoms = atomize(&runs);
        let texts: Vec<String> = segments(&atoms)
            .iter()
            .map(|seg| {
                seg.iter()
                    .map(|a| &runs[a.run].text[a.start..a.end])
                    .collect::<String>()
            })
            .collect();
        assert_eq!(texts, vec!["foobar ", "中", "文", "baz"]);
    }
}
