// src/analyze/mod.rs
//! Pure reductions over a posting set: technology, source, company and experience counts.

pub mod experience;
pub mod frequency;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::crawler::ReportConfig;
use crate::matcher::Matcher;
use crate::posting::{Posting, Source};

pub use experience::extract_experience;
pub use frequency::{percent, FrequencyTable, RankedEntry};

/// Sizes of the ranked views kept in an [`AnalysisResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopN {
    pub technologies: usize,
    pub qualification_technologies: usize,
    pub companies: usize,
    pub experience: usize,
}

impl Default for TopN {
    fn default() -> Self {
        Self {
            technologies: 30,
            qualification_technologies: 30,
            companies: 20,
            experience: 10,
        }
    }
}

impl From<&ReportConfig> for TopN {
    fn from(r: &ReportConfig) -> Self {
        Self {
            technologies: r.top_technologies,
            qualification_technologies: r.top_qualification_technologies,
            companies: r.top_companies,
            experience: r.top_experience,
        }
    }
}

/// Snapshot of one run. Holds only integers so the JSON form round-trips exactly;
/// percentages are derived with [`percent`] against `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total: usize,
    pub with_details: usize,
    pub by_source: BTreeMap<Source, usize>,
    pub technologies: Vec<RankedEntry>,
    /// Detailed mode: tags found in qualifications + preferred only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification_technologies: Option<Vec<RankedEntry>>,
    pub companies: Vec<RankedEntry>,
    /// Detailed mode: extracted experience buckets; postings without one are not counted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<RankedEntry>>,
}

impl AnalysisResult {
    pub fn percent(&self, count: usize) -> f64 {
        percent(count, self.total)
    }
}

pub struct Aggregator {
    matcher: Matcher,
    top: TopN,
    detailed: bool,
}

impl Aggregator {
    pub fn new(matcher: Matcher, top: TopN, detailed: bool) -> Self {
        Self {
            matcher,
            top,
            detailed,
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Recompute `tech_stack` on every posting from its best available text.
    pub fn tag_postings(&self, postings: &mut [Posting]) {
        for p in postings {
            p.tech_stack = self.matcher.match_text(&p.best_text());
        }
    }

    /// Tags are derived again here rather than read from `tech_stack`, so the result only
    /// depends on the posting text.
    pub fn analyze(&self, postings: &[Posting]) -> AnalysisResult {
        AnalysisResult {
            total: postings.len(),
            with_details: postings.iter().filter(|p| p.has_details()).count(),
            by_source: source_counts(postings),
            technologies: technology_distribution(&self.matcher, postings)
                .top(self.top.technologies),
            qualification_technologies: self.detailed.then(|| {
                qualification_distribution(&self.matcher, postings)
                    .top(self.top.qualification_technologies)
            }),
            companies: company_distribution(postings).top(self.top.companies),
            experience: self
                .detailed
                .then(|| experience_distribution(postings).top(self.top.experience)),
        }
    }
}

pub fn source_counts(postings: &[Posting]) -> BTreeMap<Source, usize> {
    let mut out = BTreeMap::new();
    for p in postings {
        *out.entry(p.source).or_insert(0) += 1;
    }
    out
}

/// One increment per posting per tag.
pub fn technology_distribution(matcher: &Matcher, postings: &[Posting]) -> FrequencyTable {
    let mut t = FrequencyTable::new();
    for p in postings {
        t.extend(matcher.match_text(&p.best_text()));
    }
    t
}

pub fn qualification_distribution(matcher: &Matcher, postings: &[Posting]) -> FrequencyTable {
    let mut t = FrequencyTable::new();
    for p in postings {
        t.extend(matcher.match_text(&p.qualification_text()));
    }
    t
}

/// Non-empty companies only.
pub fn company_distribution(postings: &[Posting]) -> FrequencyTable {
    let mut t = FrequencyTable::new();
    t.extend(
        postings
            .iter()
            .map(|p| p.company.as_str())
            .filter(|c| !c.is_empty()),
    );
    t
}

pub fn experience_distribution(postings: &[Posting]) -> FrequencyTable {
    let mut t = FrequencyTable::new();
    for p in postings {
        let bucket = extract_experience(&p.experience_text());
        if !bucket.is_empty() {
            t.add(&bucket);
        }
    }
    t
}
