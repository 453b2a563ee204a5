// src/ingest/providers/mod.rs
pub mod jobkorea;
pub mod saramin;
pub mod wanted;

use std::sync::Arc;

use crate::config::crawler::SourcesConfig;
use crate::ingest::transport::Fetcher;
use crate::ingest::types::SourceAdapter;
use crate::posting::Source;

/// Percent-encode a search keyword for a query string.
pub fn encode_query(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// Adapters for every enabled source, in collection order (Saramin, JobKorea, Wanted).
pub fn build_adapters(sources: &SourcesConfig, fetcher: &Fetcher) -> Vec<Arc<dyn SourceAdapter>> {
    let mut out: Vec<Arc<dyn SourceAdapter>> = Vec::new();
    for source in Source::ALL {
        match source {
            Source::Saramin if sources.saramin.enabled => out.push(Arc::new(
                saramin::SaraminAdapter::new(fetcher.clone(), sources.saramin.pages),
            )),
            Source::JobKorea if sources.jobkorea.enabled => out.push(Arc::new(
                jobkorea::JobKoreaAdapter::new(fetcher.clone(), sources.jobkorea.pages),
            )),
            Source::Wanted if sources.wanted.enabled => out.push(Arc::new(
                wanted::WantedAdapter::new(fetcher.clone(), sources.wanted.limit),
            )),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_korean_and_spaces() {
        assert_eq!(encode_query("data engineer"), "data+engineer");
        assert_eq!(
            encode_query("백엔드"),
            "%EB%B0%B1%EC%97%94%EB%93%9C"
        );
    }
}
