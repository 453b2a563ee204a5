// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod config;
pub mod dedup;
pub mod ingest;
pub mod matcher;
pub mod pipeline;
pub mod posting;
pub mod report;
pub mod taxonomy;

pub use crate::analyze::{AnalysisResult, Aggregator, RankedEntry};
pub use crate::config::{AppConfig, Mode};
pub use crate::pipeline::{Pipeline, RunOutcome, RunSummary};
pub use crate::posting::{Posting, Source};
