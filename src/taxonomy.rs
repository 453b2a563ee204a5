// src/taxonomy.rs
//! Technology taxonomy: canonical technology name → trigger phrases.
//!
//! Loaded once at startup and shared read-only (`Arc<Taxonomy>`). Sources, in order:
//! 1) `$CRAWLER_TAXONOMY_PATH`
//! 2) an explicit path from the crawler config
//! 3) `config/taxonomy.toml`, embedded at build time
//!
//! Files are TOML (`[[technology]] name = "..", triggers = [..]`) or a JSON list of
//! `{ "name": .., "triggers": [..] }`. Entry order is kept; it is the order tags are emitted in.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_TAXONOMY_PATH: &str = "CRAWLER_TAXONOMY_PATH";

const EMBEDDED_TAXONOMY: &str = include_str!("../config/taxonomy.toml");

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("taxonomy has no entries")]
    Empty,
    #[error("taxonomy entry #{0} has an empty name")]
    EmptyName(usize),
    #[error("duplicate canonical name `{0}`")]
    DuplicateName(String),
    #[error("`{0}` has no triggers")]
    NoTriggers(String),
    #[error("`{0}` has a blank trigger")]
    BlankTrigger(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaxonomyEntry {
    pub name: String,
    pub triggers: Vec<String>,
}

/// Validated, immutable taxonomy. Triggers are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    entries: Vec<TaxonomyEntry>,
}

#[derive(Deserialize)]
struct TomlTaxonomy {
    #[serde(default)]
    technology: Vec<TaxonomyEntry>,
}

impl Taxonomy {
    /// Validate and normalize a list of entries.
    pub fn new(entries: Vec<TaxonomyEntry>) -> Result<Self, TaxonomyError> {
        if entries.is_empty() {
            return Err(TaxonomyError::Empty);
        }
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(entries.len());
        for (i, e) in entries.into_iter().enumerate() {
            let name = e.name.trim().to_string();
            if name.is_empty() {
                return Err(TaxonomyError::EmptyName(i));
            }
            if !seen.insert(name.clone()) {
                return Err(TaxonomyError::DuplicateName(name));
            }
            if e.triggers.is_empty() {
                return Err(TaxonomyError::NoTriggers(name));
            }
            let mut triggers = Vec::with_capacity(e.triggers.len());
            for t in e.triggers {
                // Whitespace inside a trigger is significant ("go "), so only reject blanks.
                if t.trim().is_empty() {
                    return Err(TaxonomyError::BlankTrigger(name));
                }
                let t = t.to_lowercase();
                if !triggers.contains(&t) {
                    triggers.push(t);
                }
            }
            out.push(TaxonomyEntry { name, triggers });
        }
        Ok(Self { entries: out })
    }

    /// Convenience for tests and small inline taxonomies.
    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Result<Self, TaxonomyError> {
        Self::new(
            pairs
                .iter()
                .map(|(name, triggers)| TaxonomyEntry {
                    name: name.to_string(),
                    triggers: triggers.iter().map(|t| t.to_string()).collect(),
                })
                .collect(),
        )
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let raw: TomlTaxonomy = toml::from_str(s).context("parsing taxonomy toml")?;
        Ok(Self::new(raw.technology)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let raw: Vec<TaxonomyEntry> = serde_json::from_str(s).context("parsing taxonomy json")?;
        Ok(Self::new(raw)?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading taxonomy from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let parsed = match ext.as_str() {
            "json" => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        };
        parsed.with_context(|| format!("invalid taxonomy at {}", path.display()))
    }

    /// The taxonomy shipped in `config/taxonomy.toml`.
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_TAXONOMY).context("embedded taxonomy")
    }

    /// Resolve the taxonomy for a run (env → configured path → embedded).
    pub fn load_default(configured: Option<&Path>) -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_TAXONOMY_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_TAXONOMY_PATH} points to non-existent path"));
            }
            return Self::load_from(&pb);
        }
        if let Some(p) = configured {
            return Self::load_from(p);
        }
        Self::embedded()
    }

    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TaxonomyEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_taxonomy_is_valid() {
        let t = Taxonomy::embedded().unwrap();
        assert!(t.len() > 50);
        assert_eq!(t.entries()[0].name, "Python");
        assert!(t.get("Go").unwrap().triggers.contains(&"go ".to_string()));
    }

    #[test]
    fn rejects_duplicates_and_empty_triggers() {
        let dup = Taxonomy::from_pairs(&[("Go", &["golang"]), ("Go", &["go "])]);
        assert_eq!(dup, Err(TaxonomyError::DuplicateName("Go".into())));

        let none = Taxonomy::from_pairs(&[("Rust", &[])]);
        assert_eq!(none, Err(TaxonomyError::NoTriggers("Rust".into())));

        let blank = Taxonomy::from_pairs(&[("Rust", &["  "])]);
        assert_eq!(blank, Err(TaxonomyError::BlankTrigger("Rust".into())));

        assert_eq!(Taxonomy::new(vec![]), Err(TaxonomyError::Empty));
    }

    #[test]
    fn triggers_are_lowercased_and_deduped() {
        let t = Taxonomy::from_pairs(&[("Python", &["PYTHON", "python", "파이썬"])]).unwrap();
        assert_eq!(t.entries()[0].triggers, vec!["python", "파이썬"]);
    }

    #[test]
    fn json_and_toml_forms_agree() {
        let toml = r#"
[[technology]]
name = "Kafka"
triggers = ["kafka", "카프카"]
"#;
        let json = r#"[{"name": "Kafka", "triggers": ["kafka", "카프카"]}]"#;
        assert_eq!(
            Taxonomy::from_toml_str(toml).unwrap(),
            Taxonomy::from_json_str(json).unwrap()
        );
    }
}
