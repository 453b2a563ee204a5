// src/posting.rs
//! Canonical posting record shared by every source adapter, the analyzer and the reporter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which adapter produced a posting. Variant order is the fixed collection order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Source {
    #[default]
    Saramin,
    JobKorea,
    Wanted,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Saramin, Source::JobKorea, Source::Wanted];

    pub fn label(self) -> &'static str {
        match self {
            Source::Saramin => "Saramin",
            Source::JobKorea => "JobKorea",
            Source::Wanted => "Wanted",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One normalized job listing.
///
/// Listing-level fields are always present (possibly empty). Detail fields stay at their
/// defaults unless enrichment succeeded; `error` records why it did not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub source: Source,
    pub title: String,
    pub company: String,
    pub link: String,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub raw_text: String,
    /// rec_idx on Saramin, job id on Wanted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_ref: Option<String>,

    /// Derived by the matcher; never set by adapters.
    #[serde(default)]
    pub tech_stack: Vec<String>,

    #[serde(default)]
    pub qualifications: String,
    #[serde(default)]
    pub preferred: String,
    #[serde(default)]
    pub responsibilities: String,
    #[serde(default)]
    pub benefits: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub experience_years: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub full_description: String,
    #[serde(default)]
    pub skill_tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Fields recovered from a posting's detail view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub qualifications: String,
    pub preferred: String,
    pub responsibilities: String,
    pub benefits: String,
    pub salary: String,
    pub experience_years: String,
    pub education: String,
    pub full_description: String,
    pub skill_tags: Vec<String>,
}

impl Enrichment {
    pub fn is_empty(&self) -> bool {
        self.qualifications.is_empty()
            && self.preferred.is_empty()
            && self.responsibilities.is_empty()
            && self.benefits.is_empty()
            && self.salary.is_empty()
            && self.experience_years.is_empty()
            && self.education.is_empty()
            && self.full_description.is_empty()
            && self.skill_tags.is_empty()
    }
}

impl Posting {
    /// Listing-level constructor used by the adapters.
    pub fn listing(source: Source, title: String, company: String, link: String) -> Self {
        Self {
            source,
            title,
            company,
            link,
            ..Self::default()
        }
    }

    pub fn apply_enrichment(&mut self, e: Enrichment) {
        self.qualifications = e.qualifications;
        self.preferred = e.preferred;
        self.responsibilities = e.responsibilities;
        self.benefits = e.benefits;
        self.salary = e.salary;
        self.experience_years = e.experience_years;
        self.education = e.education;
        self.full_description = e.full_description;
        self.skill_tags = e.skill_tags;
        self.error = None;
    }

    pub fn has_details(&self) -> bool {
        !self.qualifications.is_empty() || !self.full_description.is_empty()
    }

    /// Text the matcher should see: detail sections when any were captured, else the
    /// listing snippet.
    pub fn best_text(&self) -> String {
        let detail = join_non_empty(&[
            &self.qualifications,
            &self.preferred,
            &self.responsibilities,
            &self.full_description,
            &self.skill_tags.join(" "),
        ]);
        if detail.is_empty() {
            self.raw_text.clone()
        } else {
            detail
        }
    }

    /// Qualifications and preferred sections only.
    pub fn qualification_text(&self) -> String {
        join_non_empty(&[&self.qualifications, &self.preferred])
    }

    /// Text searched for an experience requirement, most specific first.
    pub fn experience_text(&self) -> String {
        join_non_empty(&[
            &self.experience_years,
            &self.qualifications,
            &self.preferred,
            &self.full_description,
        ])
    }
}

fn join_non_empty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
