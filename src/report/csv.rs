// src/report/csv.rs
//! One row per posting. Output starts with a UTF-8 BOM so spreadsheet tools pick the encoding.

use anyhow::{anyhow, Result};

use crate::config::Mode;
use crate::posting::Posting;

pub const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Character budgets for long free-text columns.
pub const SECTION_LIMIT: usize = 500;
pub const BENEFITS_LIMIT: usize = 300;

const BASIC_HEADER: [&str; 8] = [
    "source",
    "company",
    "title",
    "link",
    "conditions",
    "sector",
    "tech_stack",
    "raw_text",
];

const DETAILED_HEADER: [&str; 12] = [
    "source",
    "company",
    "title",
    "link",
    "experience_years",
    "education",
    "salary",
    "tech_stack",
    "qualifications",
    "preferred",
    "responsibilities",
    "benefits",
];

/// First `max` characters of `s` (not bytes). Silent.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub fn render_csv(postings: &[Posting], mode: Mode) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(BOM.to_vec());

    match mode {
        Mode::Basic => {
            wtr.write_record(BASIC_HEADER)?;
            for p in postings {
                let source = p.source.to_string();
                let conditions = p.conditions.join(" | ");
                let tech = p.tech_stack.join(", ");
                let row: [&str; 8] = [
                    &source,
                    &p.company,
                    &p.title,
                    &p.link,
                    &conditions,
                    &p.sector,
                    &tech,
                    &p.raw_text,
                ];
                wtr.write_record(row)?;
            }
        }
        Mode::Detailed => {
            wtr.write_record(DETAILED_HEADER)?;
            for p in postings {
                let source = p.source.to_string();
                let tech = p.tech_stack.join(", ");
                let row: [&str; 12] = [
                    &source,
                    &p.company,
                    &p.title,
                    &p.link,
                    &p.experience_years,
                    &p.education,
                    &p.salary,
                    &tech,
                    truncate_chars(&p.qualifications, SECTION_LIMIT),
                    truncate_chars(&p.preferred, SECTION_LIMIT),
                    truncate_chars(&p.responsibilities, SECTION_LIMIT),
                    truncate_chars(&p.benefits, BENEFITS_LIMIT),
                ];
                wtr.write_record(row)?;
            }
        }
    }

    wtr.into_inner()
        .map_err(|e| anyhow!("flushing csv buffer: {}", e.error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posting::Source;

    #[test]
    fn truncation_counts_chars() {
        assert_eq!(truncate_chars("가나다라", 2), "가나");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[test]
    fn detailed_rows_are_truncated_and_quoted() {
        let mut p = Posting::listing(
            Source::Saramin,
            "Backend, \"Senior\"".into(),
            "데이터랩".into(),
            "https://x/1".into(),
        );
        p.qualifications = "가".repeat(SECTION_LIMIT + 20);
        p.benefits = "b".repeat(BENEFITS_LIMIT + 1);
        p.tech_stack = vec!["Python".into(), "Go".into()];

        let bytes = render_csv(&[p], Mode::Detailed).unwrap();
        assert!(bytes.starts_with(BOM));

        let mut rdr = csv::Reader::from_reader(&bytes[BOM.len()..]);
        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(&row[2], "Backend, \"Senior\"");
        assert_eq!(&row[1], "데이터랩");
        assert_eq!(&row[7], "Python, Go");
        assert_eq!(row[8].chars().count(), SECTION_LIMIT);
        assert_eq!(row[11].chars().count(), BENEFITS_LIMIT);
    }

    #[test]
    fn basic_header_only_for_empty_run() {
        let bytes = render_csv(&[], Mode::Basic).unwrap();
        let text = String::from_utf8(bytes[BOM.len()..].to_vec()).unwrap();
        assert_eq!(text.trim_end(), BASIC_HEADER.join(","));
    }
}
