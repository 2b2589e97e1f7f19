//! Where fonts come from.
//!
//! A [`FontLibrary`] maps family names to ordered candidate sources for each
//! weight/slant variant, and lists directories searched by file name for
//! families that were never registered. It describes fonts; it never loads
//! them (that is [`FontCache`](crate::FontCache)'s job).

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Candidate paths for the regular `sans-serif` face. CJK-capable fonts come
/// first so mixed documents render both scripts.
const SANS_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// Candidate paths for bold `sans-serif`.
const SANS_BOLD_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    // Linux
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    // Windows
    "C:\\Windows\\Fonts\\msyhbd.ttc",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Candidate paths for italic `sans-serif`.
const SANS_ITALIC_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/Library/Fonts/Arial Italic.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansOblique.ttf",
    // Windows
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// Candidate paths for bold-italic `sans-serif`.
const SANS_BOLD_ITALIC_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/Library/Fonts/Arial Bold Italic.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBoldOblique.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// Candidate paths for the regular `monospace` face.
const MONO_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Menlo.ttc",
    "/System/Library/Fonts/Monaco.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
    // Windows
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
];

/// Directories searched by file name for unregistered families.
const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

/// How deep the directory search descends (`/usr/share/fonts/truetype/x/`).
const SEARCH_DEPTH: usize = 3;

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// Where the bytes of one face come from.
#[derive(Clone)]
pub enum FontSource {
    /// A font file on disk.
    File(PathBuf),
    /// Font data already in memory.
    Bytes(Arc<[u8]>),
    /// The built-in [`ApproximateFace`](crate::ApproximateFace).
    Approximate,
}

impl fmt::Debug for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            Self::Approximate => f.write_str("Approximate"),
        }
    }
}

/// Index into a family's variant table: regular, bold, italic, bold-italic.
fn variant_index(bold: bool, italic: bool) -> usize {
    usize::from(bold) | (usize::from(italic) << 1)
}

/// Variants tried for a request, best first: exact match, then the partial
/// match, then regular.
const fn variant_chain(bold: bool, italic: bool) -> &'static [(bool, bool)] {
    match (bold, italic) {
        (true, true) => &[(true, true), (true, false), (false, true), (false, false)],
        (true, false) => &[(true, false), (false, false)],
        (false, true) => &[(false, true), (false, false)],
        (false, false) => &[(false, false)],
    }
}

/// File-name suffixes for a variant, as fonts are commonly named.
const fn variant_suffixes(bold: bool, italic: bool) -> &'static [&'static str] {
    match (bold, italic) {
        (true, true) => &["-BoldItalic", "-BoldOblique", " Bold Italic"],
        (true, false) => &["-Bold", " Bold", "Bold"],
        (false, true) => &["-Italic", "-Oblique", " Italic"],
        (false, false) => &["", "-Regular", " Regular"],
    }
}

#[derive(Debug, Clone, Default)]
struct FamilyEntry {
    variants: [Vec<FontSource>; 4],
}

/// Registered font families and search directories.
#[derive(Debug, Clone)]
pub struct FontLibrary {
    default_family: String,
    families: HashMap<String, FamilyEntry>,
    search_dirs: Vec<PathBuf>,
    /// Directory listing, built on first use.
    font_files: OnceLock<Vec<PathBuf>>,
}

impl FontLibrary {
    /// An empty library whose fallback family is `default_family`.
    #[must_use]
    pub fn new(default_family: &str) -> Self {
        Self {
            default_family: normalize(default_family),
            families: HashMap::new(),
            search_dirs: Vec::new(),
            font_files: OnceLock::new(),
        }
    }

    /// `sans-serif` and `monospace` from well-known system font paths, plus
    /// the usual system font directories. The default family is
    /// `sans-serif`.
    #[must_use]
    pub fn system() -> Self {
        let mut library = Self::new("sans-serif");
        let tables = [
            ("sans-serif", false, false, SANS_PATHS),
            ("sans-serif", true, false, SANS_BOLD_PATHS),
            ("sans-serif", false, true, SANS_ITALIC_PATHS),
            ("sans-serif", true, true, SANS_BOLD_ITALIC_PATHS),
            ("monospace", false, false, MONO_PATHS),
        ];
        for (family, bold, italic, paths) in tables {
            for path in paths {
                let _ = library.register(family, bold, italic, FontSource::File(PathBuf::from(path)));
            }
        }
        for dir in SYSTEM_FONT_DIRS {
            let _ = library.add_search_dir(dir);
        }
        library
    }

    /// `sans-serif` and `monospace` backed by the approximate face, with no
    /// files involved. Output is identical on every machine.
    #[must_use]
    pub fn approximate() -> Self {
        let mut library = Self::new("sans-serif");
        let _ = library
            .register("sans-serif", false, false, FontSource::Approximate)
            .register("monospace", false, false, FontSource::Approximate);
        library
    }

    /// Add a candidate source for one variant of `family`. Candidates are
    /// tried in registration order.
    pub fn register(&mut self, family: &str, bold: bool, italic: bool, source: FontSource) -> &mut Self {
        self.families.entry(normalize(family)).or_default().variants[variant_index(bold, italic)]
            .push(source);
        self
    }

    /// Search `dir` (and its subdirectories) for unregistered families.
    pub fn add_search_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.search_dirs.push(dir.into());
        self.font_files = OnceLock::new();
        self
    }

    /// Change the fallback family.
    pub fn set_default_family(&mut self, family: &str) -> &mut Self {
        self.default_family = normalize(family);
        self
    }

    /// The fallback family, lowercased.
    #[must_use]
    pub fn default_family(&self) -> &str {
        &self.default_family
    }

    /// Every candidate source for a request, best first.
    ///
    /// A family with registered sources uses only those; the search
    /// directories are consulted for families that have none. Within either,
    /// the exact variant comes before the fallbacks of [`variant_chain`].
    #[must_use]
    pub fn candidates(&self, family: &str, bold: bool, italic: bool) -> Vec<FontSource> {
        let family = normalize(family);
        if let Some(entry) = self.families.get(&family) {
            return variant_chain(bold, italic)
                .iter()
                .flat_map(|&(b, i)| entry.variants[variant_index(b, i)].iter().cloned())
                .collect();
        }
        if self.search_dirs.is_empty() {
            return Vec::new();
        }
        let files = self.font_files();
        variant_chain(bold, italic)
            .iter()
            .flat_map(|&(b, i)| matching_files(files, &family, b, i))
            .map(FontSource::File)
            .collect()
    }

    /// Font files under the search directories, listed once.
    fn font_files(&self) -> &[PathBuf] {
        self.font_files.get_or_init(|| {
            let mut files = Vec::new();
            for dir in &self.search_dirs {
                collect_font_files(dir, SEARCH_DEPTH, &mut files);
            }
            log::debug!("indexed {} font files", files.len());
            files
        })
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::system()
    }
}

/// Family names compare case-insensitively with surrounding space ignored.
pub(crate) fn normalize(family: &str) -> String {
    family.trim().to_lowercase()
}

fn collect_font_files(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    // read_dir order is unspecified; sort for reproducible candidate order.
    paths.sort();
    for path in paths {
        if path.is_dir() {
            if depth > 0 {
                collect_font_files(&path, depth - 1, out);
            }
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| FONT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        {
            out.push(path);
        }
    }
}

/// Files whose stem is `family` (spaces optional) plus a variant suffix.
fn matching_files(files: &[PathBuf], family: &str, bold: bool, italic: bool) -> Vec<PathBuf> {
    let squashed: String = family.chars().filter(|c| !c.is_whitespace()).collect();
    let mut wanted = Vec::new();
    for suffix in variant_suffixes(bold, italic) {
        let suffix = suffix.to_lowercase();
        wanted.push(format!("{family}{suffix}"));
        wanted.push(format!("{squashed}{suffix}"));
    }
    files
        .iter()
        .filter(|path| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| wanted.contains(&stem.to_lowercase()))
        })
        .cloned()
        .collect()
}
