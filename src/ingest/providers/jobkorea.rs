// src/ingest/providers/jobkorea.rs
//! JobKorea: paginated HTML search results. Listing only.

use async_trait::async_trait;
use metrics::histogram;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::ingest::html::{all_texts, element_text, first_text, sel};
use crate::ingest::pacing::PaceKind;
use crate::ingest::providers::encode_query;
use crate::ingest::transport::Fetcher;
use crate::ingest::types::{FetchError, ListingPage, PageBudget, SourceAdapter};
use crate::posting::{Posting, Source};

pub const DEFAULT_BASE_URL: &str = "https://www.jobkorea.co.kr";

static ITEM: Lazy<Selector> = Lazy::new(|| sel(".list-default .list-post"));
static TITLE: Lazy<Selector> = Lazy::new(|| sel(".post-list-info a.title"));
static COMPANY: Lazy<Selector> = Lazy::new(|| sel(".post-list-corp a.name"));
static OPTION: Lazy<Selector> = Lazy::new(|| sel(".option span"));

pub struct JobKoreaAdapter {
    fetcher: Fetcher,
    base_url: String,
    pages: u32,
}

impl JobKoreaAdapter {
    pub fn new(fetcher: Fetcher, pages: u32) -> Self {
        Self {
            fetcher,
            base_url: DEFAULT_BASE_URL.to_string(),
            pages,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn page_url(&self, keyword: &str, page: u32) -> String {
        format!(
            "{}/Search/?stext={}&tabType=recruit&Page_No={}",
            self.base_url,
            encode_query(keyword),
            page
        )
    }
}

pub fn parse_listing(body: &str, base_url: &str) -> ListingPage {
    let doc = Html::parse_document(body);
    let mut page = ListingPage::default();
    for item in doc.select(&ITEM) {
        match parse_item(item, base_url) {
            Some(p) => page.postings.push(p),
            None => page.dropped += 1,
        }
    }
    page
}

pub fn parse_item(item: ElementRef<'_>, base_url: &str) -> Option<Posting> {
    let title_el = item.select(&TITLE).next()?;
    let href = title_el.value().attr("href").unwrap_or_default();

    let mut posting = Posting::listing(
        Source::JobKorea,
        element_text(title_el, ""),
        first_text(item, &COMPANY).unwrap_or_default(),
        format!("{base_url}{href}"),
    );
    posting.conditions = all_texts(item, &OPTION);
    posting.raw_text = element_text(item, " ");
    Some(posting)
}

#[async_trait]
impl SourceAdapter for JobKoreaAdapter {
    fn source(&self) -> Source {
        Source::JobKorea
    }

    fn budget(&self) -> PageBudget {
        PageBudget::Pages(self.pages)
    }

    async fn fetch_page(&self, keyword: &str, page: u32) -> Result<ListingPage, FetchError> {
        let body = self
            .fetcher
            .get_text(&self.page_url(keyword, page), PaceKind::Page)
            .await?;
        let t0 = std::time::Instant::now();
        let parsed = parse_listing(&body, &self.base_url);
        histogram!("crawl_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(parsed)
    }
}
