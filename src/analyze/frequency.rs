// src/analyze/frequency.rs
//! Ordered frequency counting with first-encounter tie-breaking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub name: String,
    pub count: usize,
}

/// Counter that remembers the order keys were first seen.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    order: Vec<String>,
    index: HashMap<String, usize>,
    counts: Vec<usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.counts[i] += 1,
            None => {
                self.index.insert(key.to_string(), self.order.len());
                self.order.push(key.to_string());
                self.counts.push(1);
            }
        }
    }

    pub fn extend<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for k in keys {
            self.add(k.as_ref());
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, key: &str) -> usize {
        self.index.get(key).map_or(0, |&i| self.counts[i])
    }

    /// Full distribution, count descending; equal counts keep first-seen order.
    pub fn ranked(&self) -> Vec<RankedEntry> {
        let mut out: Vec<RankedEntry> = self
            .order
            .iter()
            .zip(&self.counts)
            .map(|(name, &count)| RankedEntry {
                name: name.clone(),
                count,
            })
            .collect();
        // sort_by is stable
        out.sort_by(|a, b| b.count.cmp(&a.count));
        out
    }

    pub fn top(&self, n: usize) -> Vec<RankedEntry> {
        let mut r = self.ranked();
        r.truncate(n);
        r
    }
}

/// `count / total` as a percentage; 0 for an empty run.
pub fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_keep_first_seen_order() {
        let mut t = FrequencyTable::new();
        t.extend(["b", "a", "c", "a", "c"]);
        let names: Vec<_> = t.ranked().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
        assert_eq!(t.get("a"), 2);
        assert_eq!(t.get("zzz"), 0);
        assert_eq!(t.top(1).len(), 1);
        assert_eq!(t.top(10).len(), 3);
    }

    #[test]
    fn percent_of_empty_run_is_zero() {
        assert_eq!(percent(3, 0), 0.0);
        assert!((percent(1, 3) - 33.333).abs() < 0.01);
    }
}
