//! Tests for font loading, fallback and cache discipline.

use std::sync::Arc;

use mdraster_font::{FontCache, FontError, FontLibrary, FontSource};

fn approximate_cache() -> FontCache {
    FontCache::new(FontLibrary::approximate())
}

// ========== measurement ==========

#[test]
fn test_measure_sums_advances() {
    let cache = approximate_cache();
    let font = cache.load_font("sans-serif", 20.0, false, false).unwrap();

    let m = font.measure("ab 中");
    assert_eq!(m.width, 12.0 * 3.0 + 20.0);
    assert_eq!(m.ascent, 16.0);
    assert_eq!(m.descent, 4.0);
    assert_eq!(font.measure("a\tb").width, 24.0);
    assert_eq!(font.measure("").width, 0.0);
}

#[test]
fn test_line_height_scales_natural_height() {
    let cache = approximate_cache();
    let font = cache.load_font("sans-serif", 10.0, false, false).unwrap();
    assert_eq!(font.line_height(1.0), 10.0);
    assert_eq!(font.line_height(1.5), 15.0);
}

#[test]
fn test_measure_matches_glyph_advances() {
    let cache = approximate_cache();
    let font = cache.load_font("sans-serif", 14.0, true, false).unwrap();
    let text = "Mixed 中文 text";
    let pen: f32 = text.chars().map(|c| font.rasterize(c).advance).sum();
    assert_eq!(font.measure(text).width, pen);
}

// ========== caching ==========

#[test]
fn test_same_key_returns_same_handle() {
    let cache = approximate_cache();
    let a = cache.load_font("Sans-Serif", 16.0, false, false).unwrap();
    let b = cache.load_font("sans-serif", 16.0, false, false).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.measure("hello").width.to_bits(), b.measure("hello").width.to_bits());
    assert_eq!(cache.load_count(), 1);
    assert_eq!(cache.handle_count(), 1);
}

#[test]
fn test_sizes_share_one_face() {
    let cache = approximate_cache();
    let small = cache.load_font("sans-serif", 10.0, false, false).unwrap();
    let large = cache.load_font("sans-serif", 30.0, false, false).unwrap();

    assert_ne!(small, large);
    assert_eq!(cache.handle_count(), 2);
    assert_eq!(cache.load_count(), 1);
}

#[test]
fn test_concurrent_same_key_loads_once() {
    let cache = Arc::new(approximate_cache());
    let handles: Vec<_> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                scope.spawn(move || cache.load_font("monospace", 12.0, false, false).unwrap())
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    assert!(handles.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(cache.load_count(), 1);
}

#[test]
fn test_clear_forces_reload() {
    let cache = approximate_cache();
    let _ = cache.load_font("sans-serif", 12.0, false, false).unwrap();
    cache.clear();
    let _ = cache.load_font("sans-serif", 12.0, false, false).unwrap();
    assert_eq!(cache.load_count(), 2);
}

#[test]
fn test_clear_forgets_substitutions() {
    let cache = approximate_cache();
    let _ = cache.load_font("NonexistentFace", 12.0, false, false).unwrap();
    assert_eq!(cache.substitutions().len(), 1);

    cache.clear();
    assert!(cache.substitutions().is_empty());
    assert_eq!(cache.handle_count(), 0);

    let again = cache.load_font("NonexistentFace", 12.0, false, false).unwrap();
    assert!(again.is_substitute());
    assert_eq!(cache.substitutions().len(), 1);
}

// ========== fallback ==========

#[test]
fn test_missing_family_falls_back_to_default() {
    let cache = approximate_cache();
    let fallback = cache.load_font("NonexistentFace", 18.0, false, false).unwrap();
    let direct = cache.load_font("sans-serif", 18.0, false, false).unwrap();

    assert!(fallback.is_substitute());
    assert!(!direct.is_substitute());
    assert_eq!(fallback.family(), "sans-serif");
    assert_eq!(fallback.measure("abc"), direct.measure("abc"));
    assert_eq!(fallback.line_height(1.5), direct.line_height(1.5));

    let subs = cache.substitutions();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].requested, "nonexistentface");
    assert_eq!(subs[0].used, "sans-serif");
}

#[test]
fn test_variant_falls_back_within_family() {
    let cache = approximate_cache();
    let font = cache.load_font("sans-serif", 12.0, true, true).unwrap();
    assert!(!font.is_substitute());
    assert!(font.key().bold() && font.key().italic());
}

#[test]
fn test_corrupt_family_falls_back() {
    let mut library = FontLibrary::approximate();
    let _ = library.register(
        "Broken",
        false,
        false,
        FontSource::Bytes(Arc::from(&b"definitely not a font"[..])),
    );
    let cache = FontCache::new(library);
    let font = cache.load_font("broken", 12.0, false, false).unwrap();
    assert!(font.is_substitute());
}

#[test]
fn test_unreadable_default_is_fatal() {
    let mut library = FontLibrary::new("sans-serif");
    let _ = library.register(
        "sans-serif",
        false,
        false,
        FontSource::File("/nonexistent/mdraster/font.ttf".into()),
    );
    let cache = FontCache::new(library);

    assert_eq!(
        cache.load_font("anything", 12.0, false, false),
        Err(FontError::DefaultFontUnavailable {
            family: "sans-serif".to_string()
        })
    );
    assert!(matches!(
        cache.load_font("sans-serif", 12.0, false, false),
        Err(FontError::DefaultFontUnavailable { .. })
    ));
}

#[test]
fn test_invalid_size_rejected() {
    let cache = approximate_cache();
    assert!(matches!(
        cache.load_font("sans-serif", 0.0, false, false),
        Err(FontError::InvalidSize { .. })
    ));
    assert!(matches!(
        cache.load_font("sans-serif", f32::NAN, false, false),
        Err(FontError::InvalidSize { .. })
    ));
}
