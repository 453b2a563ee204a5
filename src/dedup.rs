// src/dedup.rs
//! Collapse postings sharing a `(company, title)` identity key. First occurrence wins.

use std::collections::HashSet;

use metrics::counter;

use crate::ingest::ensure_metrics_described;
use crate::posting::Posting;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupPolicy {
    /// Treat an empty company as unidentifiable and drop the posting.
    pub exclude_empty_company: bool,
}

impl DedupPolicy {
    pub fn new(exclude_empty_company: bool) -> Self {
        Self {
            exclude_empty_company,
        }
    }
}

/// Stable dedup. Keys are compared verbatim (no case folding or trimming).
pub fn dedupe(postings: Vec<Posting>, policy: DedupPolicy) -> Vec<Posting> {
    ensure_metrics_described();
    let before = postings.len();
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(before);
    let mut out = Vec::with_capacity(before);

    for p in postings {
        if policy.exclude_empty_company && p.company.is_empty() {
            continue;
        }
        if seen.insert((p.company.clone(), p.title.clone())) {
            out.push(p);
        }
    }

    counter!("dedup_removed_total").increment((before - out.len()) as u64);
    out
}
