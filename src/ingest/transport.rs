// src/ingest/transport.rs
//! HTTP GET collaborator used by every source adapter.
//!
//! No retries at this layer: a network error or any non-200 status is reported once as a
//! [`FetchError`] and the caller skips that unit.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::ingest::pacing::{PaceKind, Pacer};
use crate::ingest::types::FetchError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub accept_language: String,
    pub accept: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .to_string(),
        }
    }
}

/// reqwest-backed transport with a fixed per-request timeout and browser-like headers.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(settings: &HttpSettings) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&settings.accept).context("invalid Accept header")?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&settings.accept_language)
                .context("invalid Accept-Language header")?,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .build()
            .context("building http client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

/// Paced GET that maps non-200 responses to [`FetchError::Status`].
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    pacer: Arc<dyn Pacer>,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, pacer: Arc<dyn Pacer>) -> Self {
        Self { transport, pacer }
    }

    pub fn pacer(&self) -> &Arc<dyn Pacer> {
        &self.pacer
    }

    pub async fn get_text(&self, url: &str, kind: PaceKind) -> Result<String, FetchError> {
        self.pacer.wait(kind).await;
        let resp = self.transport.get(url).await?;
        if resp.status != 200 {
            return Err(FetchError::Status(resp.status));
        }
        Ok(resp.body)
    }
}

// --- Test helper ---

/// In-memory transport: canned responses by URL (exact match first, then substring).
/// Unknown URLs answer 404. Every requested URL is recorded.
#[derive(Default)]
pub struct StaticTransport {
    routes: Vec<(String, Result<HttpResponse, FetchError>)>,
    pub calls: Mutex<Vec<String>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url_part: &str, body: impl Into<String>) -> Self {
        self.routes.push((
            url_part.to_string(),
            Ok(HttpResponse {
                status: 200,
                body: body.into(),
            }),
        ));
        self
    }

    pub fn with_status(mut self, url_part: &str, status: u16) -> Self {
        self.routes.push((
            url_part.to_string(),
            Ok(HttpResponse {
                status,
                body: String::new(),
            }),
        ));
        self
    }

    pub fn with_error(mut self, url_part: &str, err: FetchError) -> Self {
        self.routes.push((url_part.to_string(), Err(err)));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(url.to_string());
        let hit = self
            .routes
            .iter()
            .find(|(k, _)| k == url)
            .or_else(|| self.routes.iter().find(|(k, _)| url.contains(k.as_str())));
        match hit {
            Some((_, r)) => r.clone(),
            None => Ok(HttpResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::pacing::NoPacing;

    #[tokio::test]
    async fn non_200_is_a_status_error() {
        let t = StaticTransport::new()
            .with_status("/busy", 503)
            .with_body("/ok", "hello");
        let f = Fetcher::new(Arc::new(t), Arc::new(NoPacing));
        assert_eq!(
            f.get_text("https://x.test/busy", PaceKind::Page).await,
            Err(FetchError::Status(503))
        );
        assert_eq!(
            f.get_text("https://x.test/ok", PaceKind::Page).await.unwrap(),
            "hello"
        );
        assert_eq!(
            f.get_text("https://x.test/missing", PaceKind::Page).await,
            Err(FetchError::Status(404))
        );
    }

    #[tokio::test]
    async fn exact_route_wins_over_substring() {
        let t = StaticTransport::new()
            .with_body("https://x.test/a", "substring")
            .with_body("https://x.test/a?id=1", "exact");
        assert_eq!(t.get("https://x.test/a?id=1").await.unwrap().body, "exact");
        assert_eq!(t.get("https://x.test/a?id=2").await.unwrap().body, "substring");
        assert_eq!(t.requested().len(), 2);
    }
}
