// tests/collector.rs
use std::sync::Arc;
use std::time::Duration;

use job_market_crawler::ingest::pacing::{MinIntervalPacer, NoPacing, PacingConfig, Pacer};
use job_market_crawler::ingest::providers::jobkorea::JobKoreaAdapter;
use job_market_crawler::ingest::providers::saramin::SaraminAdapter;
use job_market_crawler::ingest::providers::wanted::WantedAdapter;
use job_market_crawler::ingest::transport::{Fetcher, StaticTransport};
use job_market_crawler::ingest::types::{FetchError, SourceAdapter};
use job_market_crawler::ingest::Collector;
use job_market_crawler::posting::Source;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{name}")).expect("fixture")
}

fn adapters(f: &Fetcher) -> Vec<Arc<dyn SourceAdapter>> {
    vec![
        Arc::new(SaraminAdapter::new(f.clone(), 2)),
        Arc::new(JobKoreaAdapter::new(f.clone(), 1)),
        Arc::new(WantedAdapter::new(f.clone(), 10)),
    ]
}

#[tokio::test]
async fn failing_pages_do_not_abort_the_run() {
    let transport = Arc::new(
        StaticTransport::new()
            .with_body("saramin.co.kr/zf_user/search", fixture("saramin_list.html"))
            .with_error(
                "jobkorea.co.kr",
                FetchError::Transport("connection reset".into()),
            )
            .with_status("wanted.co.kr", 503),
    );
    let pacer: Arc<dyn Pacer> = Arc::new(NoPacing);
    let f = Fetcher::new(transport.clone(), pacer.clone());
    let c = Collector::new(adapters(&f), pacer);

    let r = c.collect(&["data engineer".to_string()]).await;

    // Saramin pages 1 and 2 both parse (same fixture); JobKorea and Wanted fail.
    assert_eq!(r.pages_ok, 2);
    assert_eq!(r.pages_failed, 2);
    assert_eq!(r.items_dropped, 2);
    assert_eq!(r.postings.len(), 4);
    assert!(r.postings.iter().all(|p| p.source == Source::Saramin));
    assert_eq!(transport.requested().len(), 4);
}

#[tokio::test]
async fn empty_page_does_not_stop_html_paging() {
    let transport = Arc::new(
        StaticTransport::new()
            .with_body("recruitPage=1", "<html><body><div class=\"content\"></div></body></html>")
            .with_body("recruitPage=2", fixture("saramin_list.html")),
    );
    let pacer: Arc<dyn Pacer> = Arc::new(NoPacing);
    let f = Fetcher::new(transport.clone(), pacer.clone());
    let c = Collector::new(
        vec![Arc::new(SaraminAdapter::new(f, 2)) as Arc<dyn SourceAdapter>],
        pacer,
    );

    let r = c.collect(&["data engineer".to_string()]).await;
    assert_eq!(r.pages_ok, 2);
    assert_eq!(r.pages_failed, 0);
    assert_eq!(r.postings.len(), 2);
    let urls = transport.requested();
    assert_eq!(urls.len(), 2);
    assert!(urls[1].ends_with("recruitPage=2"));
}

#[tokio::test]
async fn keyword_then_source_then_page_order() {
    let transport = Arc::new(
        StaticTransport::new()
            .with_body("jobkorea.co.kr", fixture("jobkorea_list.html"))
            .with_body("wanted.co.kr", fixture("wanted_list.json")),
    );
    let pacer: Arc<dyn Pacer> = Arc::new(NoPacing);
    let f = Fetcher::new(transport.clone(), pacer.clone());
    let c = Collector::new(adapters(&f), pacer);

    let r = c.collect(&["a".to_string(), "b".to_string()]).await;
    let urls = transport.requested();
    assert_eq!(urls.len(), 8);
    assert!(urls[0].contains("searchword=a&recruitPage=1"));
    assert!(urls[1].contains("searchword=a&recruitPage=2"));
    assert!(urls[2].contains("stext=a&"));
    assert!(urls[3].contains("query=a&"));
    assert!(urls[4].contains("searchword=b&recruitPage=1"));

    let sources: Vec<Source> = r.postings.iter().map(|p| p.source).collect();
    assert_eq!(
        sources,
        vec![
            Source::JobKorea,
            Source::JobKorea,
            Source::Wanted,
            Source::Wanted,
            Source::JobKorea,
            Source::JobKorea,
            Source::Wanted,
            Source::Wanted,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn requests_are_paced() {
    let transport = Arc::new(StaticTransport::new());
    let pacer: Arc<dyn Pacer> = Arc::new(MinIntervalPacer::new(PacingConfig {
        page_ms: 1_000,
        detail_ms: 300,
        keyword_ms: 2_000,
    }));
    let f = Fetcher::new(transport, pacer.clone());
    let c = Collector::new(
        vec![Arc::new(JobKoreaAdapter::new(f, 2)) as Arc<dyn SourceAdapter>],
        pacer,
    );

    let t0 = tokio::time::Instant::now();
    c.collect(&["a".to_string(), "b".to_string()]).await;
    // a#1 at 0, a#2 at 1s, keyword gap to 3s, b#1 at 4s, b#2 at 5s.
    assert!(t0.elapsed() >= Duration::from_millis(5_000));
}
