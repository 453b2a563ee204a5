// src/config/crawler.rs
//! Run configuration: keywords, per-source budgets, pacing, HTTP settings and report sizes.
//!
//! Resolution order:
//! 1) `$CRAWLER_CONFIG_PATH` (must exist)
//! 2) `config/crawler.toml`
//! 3) built-in defaults for the selected mode
//!
//! `CRAWLER_MODE` picks the base defaults before the file is overlaid, so keys set in the
//! file always win. `CRAWLER_OUTPUT_DIR` replaces `output_dir` afterwards.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::ingest::pacing::PacingConfig;
use crate::ingest::transport::HttpSettings;

pub const ENV_CONFIG_PATH: &str = "CRAWLER_CONFIG_PATH";
pub const ENV_MODE: &str = "CRAWLER_MODE";
pub const ENV_OUTPUT_DIR: &str = "CRAWLER_OUTPUT_DIR";
pub const DEFAULT_CONFIG_PATH: &str = "config/crawler.toml";

/// Listing-only run vs. listing plus per-posting detail fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Basic,
    Detailed,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Mode::Basic),
            "detailed" | "detail" => Ok(Mode::Detailed),
            other => Err(anyhow!("unknown mode `{other}` (expected basic|detailed)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedSource {
    pub enabled: bool,
    pub pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitedSource {
    pub enabled: bool,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub saramin: PagedSource,
    pub jobkorea: PagedSource,
    pub wanted: LimitedSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub top_technologies: usize,
    pub top_qualification_technologies: usize,
    pub top_companies: usize,
    pub top_experience: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DedupConfig {
    /// Overrides the mode default (detailed: drop empty companies; basic: keep them).
    #[serde(default)]
    pub exclude_empty_company: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    pub mode: Mode,
    pub output_dir: PathBuf,
    pub keywords: Vec<String>,
    pub sources: SourcesConfig,
    pub pacing: PacingConfig,
    pub http: HttpSettings,
    pub report: ReportConfig,
    pub dedup: DedupConfig,
    pub taxonomy_path: Option<PathBuf>,
}

fn default_keywords() -> Vec<String> {
    ["데이터 엔지니어", "백엔드 개발자", "backend developer", "data engineer"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl AppConfig {
    pub fn defaults(mode: Mode) -> Self {
        let detailed = mode == Mode::Detailed;
        Self {
            mode,
            output_dir: PathBuf::from("output"),
            keywords: default_keywords(),
            sources: SourcesConfig {
                saramin: PagedSource {
                    enabled: true,
                    pages: 3,
                },
                jobkorea: PagedSource {
                    enabled: !detailed,
                    pages: 3,
                },
                wanted: LimitedSource {
                    enabled: true,
                    limit: 30,
                },
            },
            pacing: if detailed {
                PacingConfig {
                    page_ms: 500,
                    detail_ms: 300,
                    keyword_ms: 1_000,
                }
            } else {
                PacingConfig {
                    page_ms: 1_000,
                    detail_ms: 300,
                    keyword_ms: 2_000,
                }
            },
            http: HttpSettings::default(),
            report: ReportConfig {
                top_technologies: if detailed { 40 } else { 30 },
                top_qualification_technologies: 30,
                top_companies: 20,
                top_experience: 10,
            },
            dedup: DedupConfig::default(),
            taxonomy_path: None,
        }
    }

    /// Dedup policy after applying the optional override.
    pub fn exclude_empty_company(&self) -> bool {
        self.dedup
            .exclude_empty_company
            .unwrap_or(self.mode == Mode::Detailed)
    }

    /// Parse a TOML document. Omitted sections fall back to the defaults of the file's mode.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg = Self::parse_toml(s, None)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// `base_mode` replaces the file's `mode` when choosing the defaults underneath it.
    fn parse_toml(s: &str, base_mode: Option<Mode>) -> Result<Self> {
        let raw: RawConfig = toml::from_str(s).context("parsing crawler config")?;
        Ok(raw.into_config(base_mode))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let cfg = Self::read_file(path, None)?;
        cfg.validate()
            .with_context(|| format!("invalid crawler config at {}", path.display()))?;
        Ok(cfg)
    }

    fn read_file(path: &Path, base_mode: Option<Mode>) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading crawler config from {}", path.display()))?;
        let mut cfg = Self::parse_toml(&content, base_mode)
            .with_context(|| format!("invalid crawler config at {}", path.display()))?;
        if let Some(p) = cfg.taxonomy_path.take() {
            // Relative taxonomy paths are relative to the config file.
            let resolved = if p.is_relative() {
                path.parent().map(|dir| dir.join(&p)).unwrap_or(p)
            } else {
                p
            };
            cfg.taxonomy_path = Some(resolved);
        }
        Ok(cfg)
    }

    pub fn load_default() -> Result<Self> {
        let env_mode = match std::env::var(ENV_MODE) {
            Ok(m) => Some(
                m.parse::<Mode>()
                    .with_context(|| format!("invalid {ENV_MODE}"))?,
            ),
            Err(_) => None,
        };
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                bail!("{ENV_CONFIG_PATH} points to non-existent path");
            }
            Self::read_file(&pb, env_mode)?
        } else {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                Self::read_file(&default_path, env_mode)?
            } else {
                Self::defaults(env_mode.unwrap_or(Mode::Basic))
            }
        };
        if let Ok(dir) = std::env::var(ENV_OUTPUT_DIR) {
            if !dir.trim().is_empty() {
                cfg.output_dir = PathBuf::from(dir);
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            bail!("at least one non-empty keyword is required");
        }
        if !(self.sources.saramin.enabled
            || self.sources.jobkorea.enabled
            || self.sources.wanted.enabled)
        {
            bail!("no source enabled");
        }
        if self.http.timeout_secs == 0 {
            bail!("http.timeout_secs must be > 0");
        }
        Ok(())
    }
}

/* ----------------------------
File schema (all optional)
---------------------------- */

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    mode: Option<Mode>,
    output_dir: Option<PathBuf>,
    keywords: Option<Vec<String>>,
    taxonomy_path: Option<PathBuf>,
    #[serde(default)]
    sources: RawSources,
    #[serde(default)]
    pacing: RawPacing,
    http: Option<RawHttp>,
    #[serde(default)]
    report: RawReport,
    #[serde(default)]
    dedup: DedupConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSources {
    saramin: Option<RawPagedSource>,
    jobkorea: Option<RawPagedSource>,
    wanted: Option<RawLimitedSource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPagedSource {
    enabled: Option<bool>,
    pages: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLimitedSource {
    enabled: Option<bool>,
    limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPacing {
    page_ms: Option<u64>,
    detail_ms: Option<u64>,
    keyword_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHttp {
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    accept_language: Option<String>,
    accept: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReport {
    top_technologies: Option<usize>,
    top_qualification_technologies: Option<usize>,
    top_companies: Option<usize>,
    top_experience: Option<usize>,
}

impl RawConfig {
    fn into_config(self, base_mode: Option<Mode>) -> AppConfig {
        let mut c = AppConfig::defaults(base_mode.or(self.mode).unwrap_or(Mode::Basic));

        if let Some(dir) = self.output_dir {
            c.output_dir = dir;
        }
        if let Some(kw) = self.keywords {
            c.keywords = clean_keywords(kw);
        }
        c.taxonomy_path = self.taxonomy_path;

        if let Some(s) = self.sources.saramin {
            c.sources.saramin.enabled = s.enabled.unwrap_or(c.sources.saramin.enabled);
            c.sources.saramin.pages = s.pages.unwrap_or(c.sources.saramin.pages);
        }
        if let Some(s) = self.sources.jobkorea {
            c.sources.jobkorea.enabled = s.enabled.unwrap_or(c.sources.jobkorea.enabled);
            c.sources.jobkorea.pages = s.pages.unwrap_or(c.sources.jobkorea.pages);
        }
        if let Some(s) = self.sources.wanted {
            c.sources.wanted.enabled = s.enabled.unwrap_or(c.sources.wanted.enabled);
            c.sources.wanted.limit = s.limit.unwrap_or(c.sources.wanted.limit);
        }

        c.pacing.page_ms = self.pacing.page_ms.unwrap_or(c.pacing.page_ms);
        c.pacing.detail_ms = self.pacing.detail_ms.unwrap_or(c.pacing.detail_ms);
        c.pacing.keyword_ms = self.pacing.keyword_ms.unwrap_or(c.pacing.keyword_ms);

        if let Some(h) = self.http {
            c.http.timeout_secs = h.timeout_secs.unwrap_or(c.http.timeout_secs);
            if let Some(ua) = h.user_agent {
                c.http.user_agent = ua;
            }
            if let Some(al) = h.accept_language {
                c.http.accept_language = al;
            }
            if let Some(a) = h.accept {
                c.http.accept = a;
            }
        }

        let r = self.report;
        c.report.top_technologies = r.top_technologies.unwrap_or(c.report.top_technologies);
        c.report.top_qualification_technologies = r
            .top_qualification_technologies
            .unwrap_or(c.report.top_qualification_technologies);
        c.report.top_companies = r.top_companies.unwrap_or(c.report.top_companies);
        c.report.top_experience = r.top_experience.unwrap_or(c.report.top_experience);

        c.dedup = self.dedup;
        c
    }
}

/// Trim, drop blanks and repeated keywords; order is kept.
fn clean_keywords(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && !out.iter().any(|k| k == t) {
            out.push(t.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_defaults_differ() {
        let b = AppConfig::defaults(Mode::Basic);
        let d = AppConfig::defaults(Mode::Detailed);
        assert!(b.sources.jobkorea.enabled);
        assert!(!d.sources.jobkorea.enabled);
        assert!(!b.exclude_empty_company());
        assert!(d.exclude_empty_company());
        assert_eq!(b.pacing.page_ms, 1_000);
        assert_eq!(d.pacing.detail_ms, 300);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
mode = "detailed"
keywords = [" data engineer ", "", "data engineer", "백엔드"]

[sources.saramin]
pages = 1

[dedup]
exclude_empty_company = false
"#,
        )
        .unwrap();
        assert_eq!(cfg.mode, Mode::Detailed);
        assert_eq!(cfg.keywords, vec!["data engineer", "백엔드"]);
        assert_eq!(cfg.sources.saramin.pages, 1);
        assert!(cfg.sources.saramin.enabled);
        assert_eq!(cfg.sources.wanted.limit, 30);
        assert_eq!(cfg.pacing.keyword_ms, 1_000);
        assert!(!cfg.exclude_empty_company());
    }

    #[test]
    fn unknown_keys_and_empty_runs_are_rejected() {
        assert!(AppConfig::from_toml_str("bogus = 1").is_err());
        assert!(AppConfig::from_toml_str("keywords = []").is_err());
        assert!(AppConfig::from_toml_str(
            r#"
[sources.saramin]
enabled = false
[sources.jobkorea]
enabled = false
[sources.wanted]
enabled = false
"#
        )
        .is_err());
    }

    #[test]
    fn nested_typos_are_rejected() {
        assert!(AppConfig::from_toml_str("[sources.saramin]\nlimt = 5").is_err());
        assert!(AppConfig::from_toml_str("[sources.jobkorea]\nlimit = 5").is_err());
        assert!(AppConfig::from_toml_str("[sources.wanted]\npages = 2").is_err());
        assert!(AppConfig::from_toml_str("[pacing]\npage = 10").is_err());
        assert!(AppConfig::from_toml_str("[http]\ntimeout = 3").is_err());
        assert!(AppConfig::from_toml_str("[report]\ntop = 3").is_err());
        assert!(AppConfig::from_toml_str("[dedup]\nexclude = true").is_err());
    }

    #[test]
    fn base_mode_sits_under_explicit_keys() {
        let cfg = AppConfig::parse_toml(
            r#"
mode = "basic"
[pacing]
page_ms = 5000
"#,
            Some(Mode::Detailed),
        )
        .unwrap();
        assert_eq!(cfg.mode, Mode::Detailed);
        assert_eq!(cfg.pacing.page_ms, 5_000);
        assert_eq!(cfg.pacing.keyword_ms, 1_000);
        assert!(!cfg.sources.jobkorea.enabled);
    }

    #[test]
    fn mode_parses() {
        assert_eq!("Detailed".parse::<Mode>().unwrap(), Mode::Detailed);
        assert_eq!(" basic ".parse::<Mode>().unwrap(), Mode::Basic);
        assert!("fast".parse::<Mode>().is_err());
    }
}
