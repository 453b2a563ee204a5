// src/ingest/pacing.rs
//! Minimum spacing between outbound requests.
//!
//! Every request goes through a [`Pacer`] first. The default [`MinIntervalPacer`] keeps a
//! per-kind minimum gap since the previous request; swapping in a token bucket only means
//! another `Pacer` impl.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceKind {
    /// Listing page request.
    Page,
    /// Per-posting detail request.
    Detail,
    /// Boundary between two search keywords.
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    pub page_ms: u64,
    pub detail_ms: u64,
    pub keyword_ms: u64,
}

impl PacingConfig {
    pub fn interval(&self, kind: PaceKind) -> Duration {
        let ms = match kind {
            PaceKind::Page => self.page_ms,
            PaceKind::Detail => self.detail_ms,
            PaceKind::Keyword => self.keyword_ms,
        };
        Duration::from_millis(ms)
    }
}

#[async_trait]
pub trait Pacer: Send + Sync {
    /// Resolves once a request of `kind` may be issued.
    async fn wait(&self, kind: PaceKind);
}

pub struct MinIntervalPacer {
    cfg: PacingConfig,
    last: Mutex<Option<Instant>>,
}

impl MinIntervalPacer {
    pub fn new(cfg: PacingConfig) -> Self {
        Self {
            cfg,
            last: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Pacer for MinIntervalPacer {
    async fn wait(&self, kind: PaceKind) {
        let delay = {
            let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            let slot = match *last {
                Some(prev) => (prev + self.cfg.interval(kind)).max(now),
                None => now,
            };
            *last = Some(slot);
            slot - now
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// No spacing at all; fixtures and tests.
pub struct NoPacing;

#[async_trait]
impl Pacer for NoPacing {
    async fn wait(&self, _kind: PaceKind) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PacingConfig {
        PacingConfig {
            page_ms: 1_000,
            detail_ms: 300,
            keyword_ms: 2_000,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_request_is_immediate() {
        let p = MinIntervalPacer::new(cfg());
        let t0 = Instant::now();
        p.wait(PaceKind::Page).await;
        assert_eq!(t0.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn consecutive_requests_respect_interval() {
        let p = MinIntervalPacer::new(cfg());
        let t0 = Instant::now();
        p.wait(PaceKind::Page).await;
        p.wait(PaceKind::Page).await;
        p.wait(PaceKind::Detail).await;
        assert!(t0.elapsed() >= Duration::from_millis(1_300));
    }

    #[tokio::test(start_paused = true)]
    async fn keyword_gap_stacks_with_next_page() {
        let p = MinIntervalPacer::new(cfg());
        let t0 = Instant::now();
        p.wait(PaceKind::Page).await;
        p.wait(PaceKind::Keyword).await;
        p.wait(PaceKind::Page).await;
        assert!(t0.elapsed() >= Duration::from_millis(3_000));
    }

    #[tokio::test(start_paused = true)]
    async fn poisoned_lock_still_paces() {
        let p = MinIntervalPacer::new(cfg());
        std::thread::scope(|s| {
            let r = s
                .spawn(|| {
                    let _held = p.last.lock().unwrap();
                    panic!("holder panicked");
                })
                .join();
            assert!(r.is_err());
        });
        assert!(p.last.is_poisoned());

        let t0 = Instant::now();
        p.wait(PaceKind::Page).await;
        p.wait(PaceKind::Page).await;
        assert!(t0.elapsed() >= Duration::from_millis(1_000));
    }
}
