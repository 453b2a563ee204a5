// src/ingest/types.rs
use async_trait::async_trait;
use std::ops::RangeInclusive;

use crate::posting::{Enrichment, Posting, Source};

/// Why one unit of work (a listing page or a detail view) produced nothing.
///
/// Never propagated past the unit: the collector and the enricher log it and move on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("expected content missing: {0}")]
    Shape(String),
    #[error("posting has no detail reference")]
    MissingReference,
    #[error("source has no detail view")]
    Unsupported,
}

/// How much of a source to walk per keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBudget {
    /// HTML sources: pages 1..=n, empty pages do not stop the walk.
    Pages(u32),
    /// API source: one request returning up to n results.
    Limit(u32),
}

impl PageBudget {
    /// 1-indexed page numbers to request.
    pub fn page_numbers(self) -> RangeInclusive<u32> {
        match self {
            PageBudget::Pages(n) => 1..=n,
            PageBudget::Limit(0) => 1..=0,
            PageBudget::Limit(_) => 1..=1,
        }
    }
}

/// Postings parsed from one listing response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub postings: Vec<Posting>,
    /// Items present in the response but missing a required field.
    pub dropped: usize,
}

impl ListingPage {
    pub fn seen(&self) -> usize {
        self.postings.len() + self.dropped
    }
}

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> Source;

    fn budget(&self) -> PageBudget;

    /// Fetch one listing page for `keyword`. A malformed item is dropped, never fatal.
    async fn fetch_page(&self, keyword: &str, page: u32) -> Result<ListingPage, FetchError>;

    fn supports_detail(&self) -> bool {
        false
    }

    /// Fetch and parse the detail view of a posting this adapter produced.
    async fn fetch_detail(&self, _posting: &Posting) -> Result<Enrichment, FetchError> {
        Err(FetchError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budgets_are_one_indexed() {
        assert_eq!(
            PageBudget::Pages(3).page_numbers().collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(PageBudget::Limit(30).page_numbers().count(), 1);
        assert_eq!(PageBudget::Limit(0).page_numbers().count(), 0);
        assert_eq!(PageBudget::Pages(0).page_numbers().count(), 0);
    }
}
