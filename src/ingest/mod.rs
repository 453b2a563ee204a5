// src/ingest/mod.rs
pub mod enrich;
pub mod html;
pub mod pacing;
pub mod providers;
pub mod transport;
pub mod types;

use std::sync::Arc;

use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::ingest::pacing::{PaceKind, Pacer};
use crate::ingest::types::SourceAdapter;
use crate::posting::Posting;

/// One-time metrics registration so every series carries a description.
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("crawl_pages_total", "Listing pages fetched and parsed.");
        describe_counter!(
            "crawl_page_errors_total",
            "Listing pages skipped after a fetch or parse error."
        );
        describe_counter!(
            "crawl_items_dropped_total",
            "Listing items dropped for missing a required field."
        );
        describe_counter!("crawl_postings_total", "Postings parsed from listing pages.");
        describe_counter!("enrich_ok_total", "Detail fetches that enriched a posting.");
        describe_counter!(
            "enrich_errors_total",
            "Detail fetches that failed; the posting keeps its listing fields."
        );
        describe_counter!(
            "dedup_removed_total",
            "Postings removed by (company, title) deduplication."
        );
        describe_histogram!("crawl_parse_ms", "Listing page parse time in milliseconds.");
    });
}

/// Outcome of one collection pass. Failed pages only show up as counts.
#[derive(Debug, Clone, Default)]
pub struct CollectReport {
    pub postings: Vec<Posting>,
    pub pages_ok: usize,
    pub pages_failed: usize,
    pub items_dropped: usize,
}

/// Walks every adapter over every keyword, strictly in order.
pub struct Collector {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    pacer: Arc<dyn Pacer>,
}

impl Collector {
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, pacer: Arc<dyn Pacer>) -> Self {
        Self { adapters, pacer }
    }

    pub fn adapters(&self) -> &[Arc<dyn SourceAdapter>] {
        &self.adapters
    }

    /// Keywords outer, adapters in configured order, pages 1..=budget inner.
    /// A failing page is logged and skipped; nothing here aborts the run.
    pub async fn collect(&self, keywords: &[String]) -> CollectReport {
        ensure_metrics_described();
        let mut report = CollectReport::default();

        for (i, keyword) in keywords.iter().enumerate() {
            if i > 0 {
                self.pacer.wait(PaceKind::Keyword).await;
            }
            info!(target: "collect", keyword = %keyword, "collecting keyword");

            for adapter in &self.adapters {
                let source = adapter.source();
                let before = report.postings.len();

                for page in adapter.budget().page_numbers() {
                    match adapter.fetch_page(keyword, page).await {
                        Ok(mut listing) => {
                            report.pages_ok += 1;
                            report.items_dropped += listing.dropped;
                            counter!("crawl_pages_total").increment(1);
                            counter!("crawl_postings_total")
                                .increment(listing.postings.len() as u64);
                            counter!("crawl_items_dropped_total")
                                .increment(listing.dropped as u64);
                            debug!(
                                target: "collect",
                                %source, keyword = %keyword, page,
                                parsed = listing.postings.len(),
                                dropped = listing.dropped,
                                "page parsed"
                            );
                            report.postings.append(&mut listing.postings);
                        }
                        Err(e) => {
                            report.pages_failed += 1;
                            counter!("crawl_page_errors_total").increment(1);
                            warn!(
                                target: "collect",
                                %source, keyword = %keyword, page, error = %e,
                                "page skipped"
                            );
                        }
                    }
                }

                info!(
                    target: "collect",
                    %source, keyword = %keyword,
                    postings = report.postings.len() - before,
                    "source done"
                );
            }
        }

        report
    }
}
