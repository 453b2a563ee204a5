//! Job market crawler: collects postings from Saramin, JobKorea and Wanted, tags them with
//! technologies, and writes CSV / JSON / Markdown reports for the run.

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use job_market_crawler::config::AppConfig;
use job_market_crawler::ingest::pacing::MinIntervalPacer;
use job_market_crawler::ingest::transport::HttpTransport;
use job_market_crawler::report::RunStamp;
use job_market_crawler::taxonomy::Taxonomy;
use job_market_crawler::Pipeline;

/// `RUST_LOG` filter (default `info`); JSON lines when `CRAWLER_LOG_JSON=1`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("CRAWLER_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::load_default().context("loading crawler config")?;
    let taxonomy = Taxonomy::load_default(cfg.taxonomy_path.as_deref())
        .context("loading technology taxonomy")?;
    tracing::info!(
        target: "pipeline",
        mode = ?cfg.mode,
        keywords = cfg.keywords.len(),
        technologies = taxonomy.len(),
        output_dir = %cfg.output_dir.display(),
        "starting run"
    );

    let transport = HttpTransport::new(&cfg.http)?;
    let pacer = MinIntervalPacer::new(cfg.pacing);
    let pipeline = Pipeline::from_config(
        &cfg,
        Arc::new(taxonomy),
        Arc::new(transport),
        Arc::new(pacer),
    );

    let summary = pipeline.run(&RunStamp::now()).await?;
    for path in &summary.written {
        println!("{}", path.display());
    }
    Ok(())
}
