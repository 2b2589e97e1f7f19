//! The font cache.
//!
//! Loading is two-level. A *face* (one parsed font resource per family,
//! weight and slant) is loaded at most once and shared by every size; a
//! *handle* binds a face to one [`FontKey`] and is likewise created at most
//! once. Each level keeps a map of per-key [`OnceLock`] slots: the map lock
//! is held only to find or insert a slot, and the slot serializes concurrent
//! first requests for the same key, so distinct keys never wait on each
//! other and the same key never loads twice.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use mdraster_common::warning::{clear_warnings, warn_once};

use crate::FontError;
use crate::face::{ApproximateFace, Face, FontdueFace, Glyph, LineMetrics};
use crate::library::{FontLibrary, FontSource, normalize};

/// Cache key of a loaded font: family (lowercased), size, weight, slant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontKey {
    family: String,
    size_bits: u32,
    bold: bool,
    italic: bool,
}

impl FontKey {
    /// Build a key. Family names are case-insensitive.
    #[must_use]
    pub fn new(family: &str, size: f32, bold: bool, italic: bool) -> Self {
        Self {
            family: normalize(family),
            size_bits: size.to_bits(),
            bold,
            italic,
        }
    }

    /// Requested family, lowercased.
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Size in pixels.
    #[must_use]
    pub const fn size(&self) -> f32 {
        f32::from_bits(self.size_bits)
    }

    /// Bold weight.
    #[must_use]
    pub const fn bold(&self) -> bool {
        self.bold
    }

    /// Italic slant.
    #[must_use]
    pub const fn italic(&self) -> bool {
        self.italic
    }
}

impl fmt::Display for FontKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}px", self.family, self.size())?;
        if self.bold {
            f.write_str(" bold")?;
        }
        if self.italic {
            f.write_str(" italic")?;
        }
        Ok(())
    }
}

/// Width and vertical extent of a measured string, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Sum of advances.
    pub width: f32,
    /// Height above the baseline.
    pub ascent: f32,
    /// Depth below the baseline.
    pub descent: f32,
}

struct LoadedFont {
    key: FontKey,
    face: Arc<dyn Face>,
    /// Family actually loaded; differs from the key's on substitution.
    family: String,
    metrics: LineMetrics,
}

/// A loaded font at one size. Cheap to clone; clones share the face.
///
/// Two handles are equal when they came from the same cache slot.
#[derive(Clone)]
pub struct FontHandle(Arc<LoadedFont>);

impl FontHandle {
    /// The key this handle was requested with.
    #[must_use]
    pub fn key(&self) -> &FontKey {
        &self.0.key
    }

    /// Size in pixels.
    #[must_use]
    pub fn size(&self) -> f32 {
        self.0.key.size()
    }

    /// Family that actually backs this handle.
    #[must_use]
    pub fn family(&self) -> &str {
        &self.0.family
    }

    /// Whether the default family stood in for the requested one.
    #[must_use]
    pub fn is_substitute(&self) -> bool {
        self.0.family != self.0.key.family
    }

    /// Vertical metrics at this size.
    #[must_use]
    pub fn line_metrics(&self) -> LineMetrics {
        self.0.metrics
    }

    /// Advance of one character. Control characters advance zero.
    #[must_use]
    pub fn char_width(&self, ch: char) -> f32 {
        if ch.is_control() {
            0.0
        } else {
            self.0.face.advance(ch, self.size())
        }
    }

    /// Measure `text`: the sum of per-character advances, skipping control
    /// characters, which is exactly how far the renderer moves its pen.
    #[must_use]
    pub fn measure(&self, text: &str) -> TextMetrics {
        TextMetrics {
            width: text.chars().map(|ch| self.char_width(ch)).sum(),
            ascent: self.0.metrics.ascent,
            descent: self.0.metrics.descent,
        }
    }

    /// Line height: (ascent + descent + line gap) scaled by `multiplier`.
    #[must_use]
    pub fn line_height(&self, multiplier: f32) -> f32 {
        self.0.metrics.natural_height() * multiplier
    }

    /// Rasterize one character.
    #[must_use]
    pub fn rasterize(&self, ch: char) -> Glyph {
        self.0.face.rasterize(ch, self.size())
    }
}

impl PartialEq for FontHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("key", &self.0.key)
            .field("family", &self.0.family)
            .finish_non_exhaustive()
    }
}

/// A family that was requested but replaced by the default family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Family asked for.
    pub requested: String,
    /// Family used instead.
    pub used: String,
}

type Slot<T> = Arc<OnceLock<T>>;

/// Map from key to a once-initialized slot.
struct SlotMap<K, T> {
    slots: Mutex<HashMap<K, Slot<T>>>,
}

impl<K: Eq + Hash, T> SlotMap<K, T> {
    fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn get_or_init(&self, key: K, init: impl FnOnce() -> T) -> T
    where
        T: Clone,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key).or_default())
        };
        slot.get_or_init(init).clone()
    }

    fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn clear(&self) {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Loads fonts on demand and keeps them for reuse.
///
/// `Send + Sync`; share it across renders with `Arc<FontCache>`.
pub struct FontCache {
    library: FontLibrary,
    faces: SlotMap<(String, bool, bool), Option<Arc<dyn Face>>>,
    handles: SlotMap<FontKey, Result<FontHandle, FontError>>,
    loads: AtomicUsize,
    substitutions: Mutex<Vec<Substitution>>,
}

impl FontCache {
    /// A cache over `library`.
    #[must_use]
    pub fn new(library: FontLibrary) -> Self {
        Self {
            library,
            faces: SlotMap::new(),
            handles: SlotMap::new(),
            loads: AtomicUsize::new(0),
            substitutions: Mutex::new(Vec::new()),
        }
    }

    /// The library fonts are loaded from.
    #[must_use]
    pub fn library(&self) -> &FontLibrary {
        &self.library
    }

    /// Load (or fetch the cached) font for a family, size, weight and slant.
    ///
    /// An unavailable family is replaced by the library's default family at
    /// the same size; the substitution is logged once and recorded in
    /// [`FontCache::substitutions`].
    ///
    /// # Errors
    ///
    /// [`FontError::InvalidSize`] for a size that is not positive and
    /// finite, [`FontError::DefaultFontUnavailable`] when the default family
    /// cannot be loaded either.
    pub fn load_font(
        &self,
        family: &str,
        size: f32,
        bold: bool,
        italic: bool,
    ) -> Result<FontHandle, FontError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(FontError::InvalidSize { size });
        }
        let key = FontKey::new(family, size, bold, italic);
        self.handles
            .get_or_init(key.clone(), || self.create_handle(key))
    }

    fn create_handle(&self, key: FontKey) -> Result<FontHandle, FontError> {
        let (family, face) = match self.face(&key.family, key.bold, key.italic) {
            Some(face) => (key.family.clone(), face),
            None => self.substitute(&key.family, key.bold, key.italic)?,
        };
        let metrics = face.line_metrics(key.size());
        log::debug!("font handle created: {key} -> {family}");
        Ok(FontHandle(Arc::new(LoadedFont {
            key,
            face,
            family,
            metrics,
        })))
    }

    /// The default family's face standing in for `family`.
    fn substitute(
        &self,
        family: &str,
        bold: bool,
        italic: bool,
    ) -> Result<(String, Arc<dyn Face>), FontError> {
        let default = self.library.default_family().to_string();
        let face = if default == family {
            None
        } else {
            self.face(&default, bold, italic)
        };
        let Some(face) = face else {
            log::error!("default font family '{default}' could not be loaded");
            return Err(FontError::DefaultFontUnavailable { family: default });
        };
        let _ = warn_once("font", &format!("family '{family}' not found, using '{default}'"));
        self.record_substitution(family, &default);
        Ok((default, face))
    }

    fn face(&self, family: &str, bold: bool, italic: bool) -> Option<Arc<dyn Face>> {
        self.faces
            .get_or_init((family.to_string(), bold, italic), || {
                self.load_face(family, bold, italic)
            })
    }

    fn load_face(&self, family: &str, bold: bool, italic: bool) -> Option<Arc<dyn Face>> {
        for source in self.library.candidates(family, bold, italic) {
            let loaded: Result<Arc<dyn Face>, FontError> = match &source {
                FontSource::File(path) => {
                    FontdueFace::from_file(path).map(|f| Arc::new(f) as Arc<dyn Face>)
                }
                FontSource::Bytes(bytes) => {
                    FontdueFace::from_bytes(bytes, family).map(|f| Arc::new(f) as Arc<dyn Face>)
                }
                FontSource::Approximate => Ok(Arc::new(ApproximateFace::default())),
            };
            match loaded {
                Ok(face) => {
                    let _ = self.loads.fetch_add(1, Ordering::Relaxed);
                    log::info!("loaded font '{family}' (bold={bold}, italic={italic}) from {source:?}");
                    return Some(face);
                }
                Err(FontError::Io { .. }) => {}
                Err(err) => log::debug!("skipping font candidate: {err}"),
            }
        }
        None
    }

    fn record_substitution(&self, requested: &str, used: &str) {
        let mut subs = self
            .substitutions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !subs.iter().any(|s| s.requested == requested) {
            subs.push(Substitution {
                requested: requested.to_string(),
                used: used.to_string(),
            });
        }
    }

    /// Number of font resources read and parsed so far.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Number of distinct keys requested so far.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// Families replaced by the default family, in first-seen order.
    #[must_use]
    pub fn substitutions(&self) -> Vec<Substitution> {
        self.substitutions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop every cached face, handle and recorded substitution, and forget
    /// which warnings were already logged. Handles already given out stay
    /// valid; later requests load afresh.
    pub fn clear(&self) {
        self.handles.clear();
        self.faces.clear();
        self.substitutions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        clear_warnings();
    }
}

impl fmt::Debug for FontCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontCache")
            .field("library", &self.library)
            .field("handles", &self.handle_count())
            .field("loads", &self.load_count())
            .finish_non_exhaustive()
    }
}
