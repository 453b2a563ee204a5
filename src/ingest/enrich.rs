// src/ingest/enrich.rs
//! Detailed mode: one detail fetch per posting, failures recorded on the posting itself.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info, warn};

use crate::ingest::ensure_metrics_described;
use crate::ingest::types::SourceAdapter;
use crate::posting::Posting;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub attempted: usize,
    pub ok: usize,
    pub failed: usize,
}

/// Enrich every posting whose source has a detail view, in order.
///
/// On failure the posting keeps its listing fields, detail fields stay empty and `error`
/// holds the reason. Postings from listing-only sources are left untouched.
pub async fn enrich_all(
    adapters: &[Arc<dyn SourceAdapter>],
    postings: &mut [Posting],
) -> EnrichReport {
    ensure_metrics_described();
    let mut report = EnrichReport::default();
    let total = postings.len();

    for (i, posting) in postings.iter_mut().enumerate() {
        let Some(adapter) = adapters
            .iter()
            .find(|a| a.source() == posting.source && a.supports_detail())
        else {
            continue;
        };

        report.attempted += 1;
        match adapter.fetch_detail(posting).await {
            Ok(enrichment) => {
                posting.apply_enrichment(enrichment);
                report.ok += 1;
                counter!("enrich_ok_total").increment(1);
                debug!(
                    target: "enrich",
                    source = %posting.source, n = i + 1, total,
                    title = %posting.title,
                    "detail enriched"
                );
            }
            Err(e) => {
                posting.error = Some(e.to_string());
                report.failed += 1;
                counter!("enrich_errors_total").increment(1);
                warn!(
                    target: "enrich",
                    source = %posting.source, link = %posting.link, error = %e,
                    "detail skipped"
                );
            }
        }
    }

    info!(
        target: "enrich",
        attempted = report.attempted, ok = report.ok, failed = report.failed,
        "enrichment finished"
    );
    report
}
