// tests/enrich.rs
use std::sync::Arc;

use job_market_crawler::ingest::enrich::enrich_all;
use job_market_crawler::ingest::pacing::NoPacing;
use job_market_crawler::ingest::providers::jobkorea::JobKoreaAdapter;
use job_market_crawler::ingest::providers::wanted::WantedAdapter;
use job_market_crawler::ingest::transport::{Fetcher, StaticTransport};
use job_market_crawler::ingest::types::{FetchError, SourceAdapter};
use job_market_crawler::posting::{Posting, Source};

fn wanted_posting(id: u32) -> Posting {
    let mut p = Posting::listing(
        Source::Wanted,
        format!("Engineer {id}"),
        format!("Company {id}"),
        format!("https://www.wanted.co.kr/wd/{id}"),
    );
    p.detail_ref = Some(id.to_string());
    p.raw_text = format!("Engineer {id} Company {id}");
    p
}

#[tokio::test]
async fn one_failed_detail_among_ten_is_isolated() {
    let detail = r#"{"job": {"requirements": "Python 3년 이상", "preferred": "Kafka"}}"#;
    let mut t = StaticTransport::new().with_error(
        "https://www.wanted.co.kr/api/v4/jobs/7",
        FetchError::Transport("operation timed out".into()),
    );
    for id in (1..=10).filter(|&i| i != 7) {
        t = t.with_body(&format!("https://www.wanted.co.kr/api/v4/jobs/{id}"), detail);
    }
    let f = Fetcher::new(Arc::new(t), Arc::new(NoPacing));
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![Arc::new(WantedAdapter::new(f, 30))];

    let mut postings: Vec<Posting> = (1..=10).map(wanted_posting).collect();
    let report = enrich_all(&adapters, &mut postings).await;

    assert_eq!(report.attempted, 10);
    assert_eq!(report.ok, 9);
    assert_eq!(report.failed, 1);

    let failed = &postings[6];
    assert_eq!(failed.qualifications, "");
    assert_eq!(failed.title, "Engineer 7");
    assert_eq!(failed.company, "Company 7");
    assert!(failed.error.as_deref().unwrap().contains("timed out"));

    for (i, p) in postings.iter().enumerate().filter(|(i, _)| *i != 6) {
        assert_eq!(p.qualifications, "Python 3년 이상", "posting {i}");
        assert!(p.error.is_none());
    }
}

#[tokio::test]
async fn listing_only_sources_are_not_touched() {
    let t = Arc::new(StaticTransport::new());
    let f = Fetcher::new(t.clone(), Arc::new(NoPacing));
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(JobKoreaAdapter::new(f.clone(), 1)),
        Arc::new(WantedAdapter::new(f, 30)),
    ];
    let mut postings = vec![Posting::listing(
        Source::JobKorea,
        "t".into(),
        "c".into(),
        "l".into(),
    )];
    let before = postings.clone();

    let report = enrich_all(&adapters, &mut postings).await;
    assert_eq!(report.attempted, 0);
    assert_eq!(postings, before);
    assert!(t.requested().is_empty());
}
