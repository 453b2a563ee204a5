// src/ingest/providers/wanted.rs
//! Wanted: JSON search API (single request, result-count limit) plus a JSON detail endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::ingest::pacing::PaceKind;
use crate::ingest::providers::encode_query;
use crate::ingest::transport::Fetcher;
use crate::ingest::types::{FetchError, ListingPage, PageBudget, SourceAdapter};
use crate::posting::{Enrichment, Posting, Source};

pub const DEFAULT_BASE_URL: &str = "https://www.wanted.co.kr";

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    data: Vec<Value>,
}

pub struct WantedAdapter {
    fetcher: Fetcher,
    base_url: String,
    limit: u32,
}

impl WantedAdapter {
    pub fn new(fetcher: Fetcher, limit: u32) -> Self {
        Self {
            fetcher,
            base_url: DEFAULT_BASE_URL.to_string(),
            limit,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn search_url(&self, keyword: &str) -> String {
        format!(
            "{}/api/v4/jobs?country=kr&job_sort=company.response_rate_order&years=-1&locations=all&query={}&limit={}",
            self.base_url,
            encode_query(keyword),
            self.limit
        )
    }

    pub fn detail_url(&self, job_id: &str) -> String {
        format!("{}/api/v4/jobs/{}", self.base_url, job_id)
    }
}

pub fn parse_listing(body: &str, base_url: &str) -> Result<ListingPage, FetchError> {
    let resp: ListResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    let mut page = ListingPage::default();
    for raw in resp.data {
        match parse_item(raw, base_url) {
            Some(p) => page.postings.push(p),
            None => page.dropped += 1,
        }
    }
    Ok(page)
}

/// One element of `data[]`. `None` only when `position` is not a string; `company.name` and
/// `id` fall back to empty when missing or oddly shaped.
pub fn parse_item(raw: Value, base_url: &str) -> Option<Posting> {
    let position = raw.get("position").and_then(Value::as_str)?.to_string();
    let company = raw
        .get("company")
        .map(|c| str_field(c, "name"))
        .unwrap_or_default();
    let id = raw.get("id").and_then(id_string);

    let link = format!("{base_url}/wd/{}", id.as_deref().unwrap_or_default());
    let raw_text = format!("{position} {company}");
    let mut posting = Posting::listing(Source::Wanted, position, company, link);
    posting.detail_ref = id;
    posting.raw_text = raw_text;
    Some(posting)
}

fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn str_field(obj: &Value, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

/// Parse `/api/v4/jobs/<id>`. Fields are read leniently; only a missing `job` object fails.
pub fn parse_detail(body: &str) -> Result<Enrichment, FetchError> {
    let root: Value = serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    let job = root
        .get("job")
        .filter(|j| j.is_object())
        .ok_or_else(|| FetchError::Shape("job object".into()))?;

    let skill_tags = job
        .get("skill_tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(|t| t.get("title").and_then(Value::as_str))
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Enrichment {
        qualifications: str_field(job, "requirements"),
        preferred: str_field(job, "preferred"),
        responsibilities: str_field(job, "responsibilities"),
        benefits: str_field(job, "benefits"),
        full_description: str_field(job, "detail"),
        skill_tags,
        ..Enrichment::default()
    })
}

#[async_trait]
impl SourceAdapter for WantedAdapter {
    fn source(&self) -> Source {
        Source::Wanted
    }

    fn budget(&self) -> PageBudget {
        PageBudget::Limit(self.limit)
    }

    async fn fetch_page(&self, keyword: &str, _page: u32) -> Result<ListingPage, FetchError> {
        let body = self
            .fetcher
            .get_text(&self.search_url(keyword), PaceKind::Page)
            .await?;
        parse_listing(&body, &self.base_url)
    }

    fn supports_detail(&self) -> bool {
        true
    }

    async fn fetch_detail(&self, posting: &Posting) -> Result<Enrichment, FetchError> {
        let id = posting
            .detail_ref
            .as_deref()
            .ok_or(FetchError::MissingReference)?;
        let body = self
            .fetcher
            .get_text(&self.detail_url(id), PaceKind::Detail)
            .await?;
        parse_detail(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_requires_position() {
        assert!(parse_item(json!({"id": 1, "company": {"name": "A"}}), DEFAULT_BASE_URL).is_none());
        assert!(parse_item(json!("not an object"), DEFAULT_BASE_URL).is_none());

        let p = parse_item(
            json!({"id": 1234, "position": "Data Engineer", "company": {"name": "토스"}}),
            DEFAULT_BASE_URL,
        )
        .unwrap();
        assert_eq!(p.link, "https://www.wanted.co.kr/wd/1234");
        assert_eq!(p.detail_ref.as_deref(), Some("1234"));
        assert_eq!(p.raw_text, "Data Engineer 토스");
        assert!(p.conditions.is_empty());
    }

    #[test]
    fn missing_company_is_empty_string() {
        let p = parse_item(json!({"id": "9", "position": "BE"}), DEFAULT_BASE_URL).unwrap();
        assert_eq!(p.company, "");
    }

    #[test]
    fn odd_company_and_id_shapes_keep_the_item() {
        let body = r#"{"data": [
            {"id": 1, "position": "Backend", "company": "Acme"},
            {"id": [2], "position": "Data", "company": {"name": 7}},
            {"id": 3, "position": "Infra", "company": {"name": "B"}}
        ]}"#;
        let page = parse_listing(body, DEFAULT_BASE_URL).unwrap();
        assert_eq!(page.dropped, 0);
        assert_eq!(page.postings.len(), 3);
        assert_eq!(page.postings[0].company, "");
        assert_eq!(page.postings[0].detail_ref.as_deref(), Some("1"));
        assert_eq!(page.postings[1].company, "");
        assert_eq!(page.postings[1].detail_ref, None);
        assert_eq!(page.postings[2].company, "B");
    }

    #[test]
    fn listing_counts_dropped_items() {
        let body = r#"{"data": [{"id": 1, "position": "A"}, {"id": 2}, {"id": 3, "position": "C"}]}"#;
        let page = parse_listing(body, DEFAULT_BASE_URL).unwrap();
        assert_eq!(page.postings.len(), 2);
        assert_eq!(page.dropped, 1);
        assert!(matches!(
            parse_listing("<html>", DEFAULT_BASE_URL),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn detail_reads_sections_and_skill_tags() {
        let body = r#"{"job": {"requirements": "Python 3년 이상", "preferred": "Airflow",
            "detail": 42, "skill_tags": [{"title": "Kafka"}, {"id": 3}]}}"#;
        let e = parse_detail(body).unwrap();
        assert_eq!(e.qualifications, "Python 3년 이상");
        assert_eq!(e.preferred, "Airflow");
        assert_eq!(e.full_description, "");
        assert_eq!(e.skill_tags, vec!["Kafka"]);

        assert!(matches!(parse_detail("{}"), Err(FetchError::Shape(_))));
    }
}
