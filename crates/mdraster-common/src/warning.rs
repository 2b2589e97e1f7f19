//! Deduplicated pipeline warnings.
//!
//! Recoverable conditions (a substituted font family, Markdown syntax the
//! parser treats as plain text) are reported once per unique message through
//! the `log` facade, so a document with hundreds of affected runs does not
//! flood the terminal.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a degraded condition (logged once per unique message).
///
/// Returns `true` if the message was emitted, `false` if it was a duplicate.
///
/// # Example
/// ```ignore
/// warn_once("font", "family 'Foo' not found, using 'sans-serif'");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_time {
        log::warn!(target: "mdraster", "[{component}] {message}");
    }
    first_time
}

/// Clear all recorded warnings (call between independent renders).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_deduplicates() {
        let message = "unique message for dedup test";
        assert!(warn_once("test", message));
        assert!(!warn_once("test", message));
        assert!(warn_once("other", message));
    }
}
