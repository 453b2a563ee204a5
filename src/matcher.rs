// src/matcher.rs
//! Substring tagger over a [`Taxonomy`].
//!
//! Plain containment on the lower-cased text: no tokenization and no word boundaries, so a
//! short trigger such as `ts` fires inside `results`. Those false positives are part of the
//! reported numbers and are kept as-is.

use std::sync::Arc;

use crate::taxonomy::Taxonomy;

#[derive(Debug, Clone)]
pub struct Matcher {
    taxonomy: Arc<Taxonomy>,
}

impl Matcher {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Canonical names whose triggers occur in `text`, in taxonomy order, each at most once.
    pub fn match_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let lower = text.to_lowercase();
        self.taxonomy
            .entries()
            .iter()
            .filter(|e| e.triggers.iter().any(|t| lower.contains(t.as_str())))
            .map(|e| e.name.clone())
            .collect()
    }
}
