//! Ranked CSS selector probing over parsed HTML.
//!
//! note.com markup shifts between layouts, so every lookup carries an
//! ordered list of candidate selectors. A probe returns whatever the first
//! matching candidate yields; an invalid or unmatched selector is simply
//! skipped. Probing never panics and never errors — no match is an empty
//! result.

use scraper::{ElementRef, Selector};

/// Return the first element matched by the highest-ranked candidate
/// selector that matches anything under `scope`.
pub fn probe_first<'a>(scope: ElementRef<'a>, candidates: &[&str]) -> Option<ElementRef<'a>> {
    for candidate in candidates {
        if let Ok(sel) = Selector::parse(candidate) {
            if let Some(el) = scope.select(&sel).next() {
                return Some(el);
            }
        }
    }
    None
}

/// Return every element matched by the highest-ranked candidate selector
/// that matches anything under `scope`. Lower-ranked candidates are only
/// consulted when all higher-ranked ones match nothing.
pub fn probe_all<'a>(scope: ElementRef<'a>, candidates: &[&str]) -> Vec<ElementRef<'a>> {
    for candidate in candidates {
        if let Ok(sel) = Selector::parse(candidate) {
            let found: Vec<ElementRef<'a>> = scope.select(&sel).collect();
            if !found.is_empty() {
                return found;
            }
        }
    }
    Vec::new()
}
