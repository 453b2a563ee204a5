// src/pipeline.rs
//! collect → (detailed: enrich) → tag → dedup → analyze → render → write.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::analyze::{AnalysisResult, Aggregator, TopN};
use crate::config::{AppConfig, Mode};
use crate::dedup::{dedupe, DedupPolicy};
use crate::ingest::enrich::{enrich_all, EnrichReport};
use crate::ingest::pacing::Pacer;
use crate::ingest::providers::build_adapters;
use crate::ingest::transport::{Fetcher, Transport};
use crate::ingest::Collector;
use crate::matcher::Matcher;
use crate::posting::Posting;
use crate::report::{self, RunStamp};
use crate::taxonomy::Taxonomy;

/// In-memory outcome of a run, before anything is written.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Tagged, deduplicated postings in collection order.
    pub postings: Vec<Posting>,
    pub result: AnalysisResult,
    pub collected: usize,
    pub pages_failed: usize,
    pub items_dropped: usize,
    pub enrich: Option<EnrichReport>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub written: Vec<PathBuf>,
}

pub struct Pipeline {
    mode: Mode,
    keywords: Vec<String>,
    collector: Collector,
    aggregator: Aggregator,
    dedup: DedupPolicy,
    output_dir: PathBuf,
}

impl Pipeline {
    pub fn new(
        mode: Mode,
        keywords: Vec<String>,
        collector: Collector,
        aggregator: Aggregator,
        dedup: DedupPolicy,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            mode,
            keywords,
            collector,
            aggregator,
            dedup,
            output_dir,
        }
    }

    /// Wire adapters, matcher and policies from configuration.
    pub fn from_config(
        cfg: &AppConfig,
        taxonomy: Arc<Taxonomy>,
        transport: Arc<dyn Transport>,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        let fetcher = Fetcher::new(transport, pacer.clone());
        let adapters = build_adapters(&cfg.sources, &fetcher);
        let detailed = cfg.mode == Mode::Detailed;
        Self::new(
            cfg.mode,
            cfg.keywords.clone(),
            Collector::new(adapters, pacer),
            Aggregator::new(Matcher::new(taxonomy), TopN::from(&cfg.report), detailed),
            DedupPolicy::new(cfg.exclude_empty_company()),
            cfg.output_dir.clone(),
        )
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub async fn process(&self) -> RunOutcome {
        let collected = self.collector.collect(&self.keywords).await;
        let mut postings = collected.postings;
        let total_collected = postings.len();
        info!(
            target: "pipeline",
            postings = total_collected,
            pages_ok = collected.pages_ok,
            pages_failed = collected.pages_failed,
            "collection finished"
        );

        let enrich = match self.mode {
            Mode::Detailed => {
                Some(enrich_all(self.collector.adapters(), &mut postings).await)
            }
            Mode::Basic => None,
        };

        self.aggregator.tag_postings(&mut postings);
        let postings = dedupe(postings, self.dedup);
        let result = self.aggregator.analyze(&postings);

        RunOutcome {
            postings,
            result,
            collected: total_collected,
            pages_failed: collected.pages_failed,
            items_dropped: collected.items_dropped,
            enrich,
        }
    }

    /// Full run including artifact output. Only configuration-class failures (unwritable
    /// output, serialization) surface as errors.
    pub async fn run(&self, stamp: &RunStamp) -> Result<RunSummary> {
        let outcome = self.process().await;
        let rendered = report::render(&outcome.result, &outcome.postings, self.mode, stamp)?;
        let written = report::write_artifacts(&rendered, &self.output_dir)?;

        info!(
            target: "pipeline",
            mode = ?self.mode,
            collected = outcome.collected,
            pages_failed = outcome.pages_failed,
            details_failed = outcome.enrich.map_or(0, |e| e.failed),
            unique = outcome.postings.len(),
            artifacts = ?written,
            "run finished"
        );
        Ok(RunSummary { outcome, written })
    }
}
