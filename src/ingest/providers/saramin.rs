// src/ingest/providers/saramin.rs
//! Saramin: paginated HTML search results plus a relay detail page per posting.

use async_trait::async_trait;
use metrics::histogram;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::ingest::html::{all_texts, element_text, first_text, sel};
use crate::ingest::pacing::PaceKind;
use crate::ingest::providers::encode_query;
use crate::ingest::transport::Fetcher;
use crate::ingest::types::{FetchError, ListingPage, PageBudget, SourceAdapter};
use crate::posting::{Enrichment, Posting, Source};

pub const DEFAULT_BASE_URL: &str = "https://www.saramin.co.kr";

static ITEM: Lazy<Selector> = Lazy::new(|| sel(".item_recruit"));
static TITLE: Lazy<Selector> = Lazy::new(|| sel(".job_tit a"));
static COMPANY: Lazy<Selector> = Lazy::new(|| sel(".corp_name a"));
static CONDITION: Lazy<Selector> = Lazy::new(|| sel(".job_condition span"));
static SECTOR: Lazy<Selector> = Lazy::new(|| sel(".job_sector"));

static SECTION: Lazy<Selector> = Lazy::new(|| sel(".jv_cont"));
static SECTION_HEADER: Lazy<Selector> = Lazy::new(|| sel(".jv_header, .tit_cont"));
static SECTION_BODY: Lazy<Selector> = Lazy::new(|| sel(".jv_detail, .cont"));
static SALARY: Lazy<Selector> = Lazy::new(|| sel(".salary"));
static CAREER: Lazy<Selector> = Lazy::new(|| sel(".career"));
static EDUCATION: Lazy<Selector> = Lazy::new(|| sel(".education"));
static FULL_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| sel(".jv_detail, .job_detail, .wrap_jv_cont"));

static REC_IDX: Lazy<Regex> = Lazy::new(|| Regex::new(r"rec_idx=(\d+)").unwrap());

/// Header keywords → detail field. First matching group wins.
const QUALIFICATION_HEADERS: &[&str] = &[
    "자격요건",
    "자격 요건",
    "필수",
    "지원자격",
    "requirements",
    "qualifications",
];
const PREFERRED_HEADERS: &[&str] = &["우대", "선호", "가산점", "preferred"];
const RESPONSIBILITY_HEADERS: &[&str] = &[
    "담당업무",
    "업무내용",
    "주요업무",
    "담당 업무",
    "responsibilities",
];
const BENEFIT_HEADERS: &[&str] = &["복리후생", "혜택", "복지", "benefits"];

pub struct SaraminAdapter {
    fetcher: Fetcher,
    base_url: String,
    pages: u32,
}

impl SaraminAdapter {
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
            "{}/zf_user/search/recruit?searchType=search&searchword={}&recruitPage={}",
            self.base_url,
            encode_query(keyword),
            page
        )
    }

    fn detail_url(&self, posting: &Posting) -> Option<String> {
        match &posting.detail_ref {
            Some(id) => Some(relay_view_url(&self.base_url, id)),
            None if !posting.link.is_empty() => Some(posting.link.clone()),
            None => None,
        }
    }
}

fn relay_view_url(base: &str, rec_idx: &str) -> String {
    format!("{base}/zf_user/jobs/relay/view?rec_idx={rec_idx}")
}

/// Parse a search result page.
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

/// One `.item_recruit` block. `None` when the title link is missing.
pub fn parse_item(item: ElementRef<'_>, base_url: &str) -> Option<Posting> {
    let title_el = item.select(&TITLE).next()?;
    let title = element_text(title_el, "");
    let href = title_el.value().attr("href").unwrap_or_default();

    let detail_ref = REC_IDX
        .captures(href)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    let link = match &detail_ref {
        Some(id) => relay_view_url(base_url, id),
        None => format!("{base_url}{href}"),
    };

    let company = first_text(item, &COMPANY).unwrap_or_default();
    let mut posting = Posting::listing(Source::Saramin, title, company, link);
    posting.detail_ref = detail_ref;
    posting.conditions = all_texts(item, &CONDITION);
    posting.sector = first_text(item, &SECTOR).unwrap_or_default();
    posting.raw_text = element_text(item, " ");
    Some(posting)
}

/// Parse a relay detail page into labelled sections.
pub fn parse_detail(body: &str) -> Result<Enrichment, FetchError> {
    let doc = Html::parse_document(body);
    let mut out = Enrichment::default();

    for section in doc.select(&SECTION) {
        let (Some(header), Some(content)) = (
            section.select(&SECTION_HEADER).next(),
            section.select(&SECTION_BODY).next(),
        ) else {
            continue;
        };
        let header = element_text(header, "");
        let content = element_text(content, "\n");
        let lower = header.to_lowercase();
        let has = |keys: &[&str]| keys.iter().any(|k| lower.contains(k));

        if has(QUALIFICATION_HEADERS) {
            out.qualifications = content;
        } else if has(PREFERRED_HEADERS) {
            out.preferred = content;
        } else if has(RESPONSIBILITY_HEADERS) {
            out.responsibilities = content;
        } else if has(BENEFIT_HEADERS) {
            out.benefits = content;
        }
    }

    let root = doc.root_element();
    out.salary = first_text(root, &SALARY).unwrap_or_default();
    out.experience_years = first_text(root, &CAREER).unwrap_or_default();
    out.education = first_text(root, &EDUCATION).unwrap_or_default();
    out.full_description = root
        .select(&FULL_DESCRIPTION)
        .next()
        .map(|el| element_text(el, "\n"))
        .unwrap_or_default();

    if out.is_empty() {
        return Err(FetchError::Shape("no recognizable detail sections".into()));
    }
    Ok(out)
}

#[async_trait]
impl SourceAdapter for SaraminAdapter {
    fn source(&self) -> Source {
        Source::Saramin
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

    fn supports_detail(&self) -> bool {
        true
    }

    async fn fetch_detail(&self, posting: &Posting) -> Result<Enrichment, FetchError> {
        let url = self.detail_url(posting).ok_or(FetchError::MissingReference)?;
        let body = self.fetcher.get_text(&url, PaceKind::Detail).await?;
        parse_detail(&body)
    }
}
