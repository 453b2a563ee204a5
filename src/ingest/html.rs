// src/ingest/html.rs
//! Small helpers over `scraper` shared by the HTML adapters.

use scraper::{ElementRef, Selector};

/// Compile a selector known at build time. Only called from `Lazy` statics.
pub(crate) fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector `{css}`: {e:?}"))
}

/// Text of `el`: each text node trimmed, empty ones skipped, joined with `sep`.
pub fn element_text(el: ElementRef<'_>, sep: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Text of the first match below `scope`, if any.
pub fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|el| element_text(el, ""))
}

/// Texts of every match below `scope`, in document order.
pub fn all_texts(scope: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    scope
        .select(selector)
        .map(|el| element_text(el, ""))
        .filter(|t| !t.is_empty())
        .collect()
}
