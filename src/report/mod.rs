// src/report/mod.rs
//! Turns an [`AnalysisResult`] plus its postings into write-once run artifacts.

pub mod csv;
pub mod json;
pub mod markdown;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analyze::AnalysisResult;
use crate::config::Mode;
use crate::posting::Posting;

/// Run timestamp in both file-name and display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStamp {
    /// `YYYYMMDD_HHMMSS`
    pub file: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub display: String,
}

impl RunStamp {
    pub fn now() -> Self {
        Self::at(Local::now())
    }

    pub fn at(t: DateTime<Local>) -> Self {
        Self::from_naive(t.naive_local())
    }

    pub fn from_naive(t: NaiveDateTime) -> Self {
        Self {
            file: t.format("%Y%m%d_%H%M%S").to_string(),
            display: t.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Artifacts of one run, in write order: CSV, JSON file(s), Markdown.
#[derive(Debug, Clone, Default)]
pub struct RenderedReport {
    pub artifacts: Vec<Artifact>,
}

impl RenderedReport {
    pub fn get(&self, file_name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.file_name == file_name)
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.file_name.as_str()).collect()
    }
}

/// Render every artifact for `mode` in memory.
///
/// Basic: `jobs_<ts>.csv`, `analysis_<ts>.json` (compact), `report_<ts>.md`.
/// Detailed: `jobs_detailed_<ts>.csv`, `jobs_full_<ts>.json` (postings),
/// `analysis_detailed_<ts>.json`, `report_detailed_<ts>.md`.
pub fn render(
    result: &AnalysisResult,
    postings: &[Posting],
    mode: Mode,
    stamp: &RunStamp,
) -> Result<RenderedReport> {
    let ts = &stamp.file;
    let csv = csv::render_csv(postings, mode)?;
    let md = markdown::render_markdown(result, postings, mode, &stamp.display);

    let artifacts = match mode {
        Mode::Basic => vec![
            Artifact {
                file_name: format!("jobs_{ts}.csv"),
                bytes: csv,
            },
            Artifact {
                file_name: format!("analysis_{ts}.json"),
                bytes: json::render_compact(result, ts)?.into_bytes(),
            },
            Artifact {
                file_name: format!("report_{ts}.md"),
                bytes: md.into_bytes(),
            },
        ],
        Mode::Detailed => vec![
            Artifact {
                file_name: format!("jobs_detailed_{ts}.csv"),
                bytes: csv,
            },
            Artifact {
                file_name: format!("jobs_full_{ts}.json"),
                bytes: json::render_postings(postings)?.into_bytes(),
            },
            Artifact {
                file_name: format!("analysis_detailed_{ts}.json"),
                bytes: json::render_analysis(result)?.into_bytes(),
            },
            Artifact {
                file_name: format!("report_detailed_{ts}.md"),
                bytes: md.into_bytes(),
            },
        ],
    };
    Ok(RenderedReport { artifacts })
}

/// Write every artifact into `dir` (created if missing). Returns the written paths.
pub fn write_artifacts(report: &RenderedReport, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output dir {}", dir.display()))?;

    let mut written = Vec::with_capacity(report.artifacts.len());
    for a in &report.artifacts {
        let path = dir.join(&a.file_name);
        fs::write(&path, &a.bytes).with_context(|| format!("writing {}", path.display()))?;
        info!(target: "report", path = %path.display(), bytes = a.bytes.len(), "artifact written");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn stamp_formats() {
        let t = NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap();
        let s = RunStamp::from_naive(t);
        assert_eq!(s.file, "20260307_090501");
        assert_eq!(s.display, "2026-03-07 09:05:01");
    }
}
