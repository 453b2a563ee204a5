// src/analyze/experience.rs
//! Experience-requirement bucket: the first match of a fixed, ordered pattern list.

use once_cell::sync::Lazy;
use regex::Regex;

/// Precedence order: "N+ years", "N~M years", "N years of experience", "Nth year".
/// Within a group, Korean phrasing is tried before English.
static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d+\s*년\s*이상",
        r"(?i)\d+\s*\+\s*years?",
        r"\d+\s*~\s*\d+\s*년",
        r"(?i)\d+\s*[-~–]\s*\d+\s*years?",
        r"경력\s*\d+\s*년",
        r"(?i)\d+\s*years?\s+of\s+(?:professional\s+)?experience",
        r"\d+\s*년차",
        r"(?i)\d+(?:st|nd|rd|th)[\s-]+year",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid experience pattern `{p}`: {e}")))
    .collect()
});

/// Matched text of the first pattern (in precedence order) found anywhere in `text`.
/// Empty when nothing matches.
pub fn extract_experience(text: &str) -> String {
    PATTERNS
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
