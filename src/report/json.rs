// src/report/json.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analyze::{AnalysisResult, RankedEntry};
use crate::posting::{Posting, Source};

/// Basic-mode analysis artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactAnalysis {
    pub timestamp: String,
    pub total: usize,
    pub by_source: BTreeMap<Source, usize>,
    pub technologies: Vec<RankedEntry>,
    pub companies: Vec<RankedEntry>,
}

impl CompactAnalysis {
    pub fn new(result: &AnalysisResult, timestamp: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            total: result.total,
            by_source: result.by_source.clone(),
            technologies: result.technologies.clone(),
            companies: result.companies.clone(),
        }
    }
}

pub fn render_compact(result: &AnalysisResult, timestamp: &str) -> Result<String> {
    serde_json::to_string_pretty(&CompactAnalysis::new(result, timestamp))
        .context("serializing compact analysis")
}

pub fn render_analysis(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("serializing analysis")
}

/// Every posting verbatim, including `error` on failed enrichments.
pub fn render_postings(postings: &[Posting]) -> Result<String> {
    serde_json::to_string_pretty(postings).context("serializing postings")
}
