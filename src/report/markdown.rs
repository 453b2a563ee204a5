// src/report/markdown.rs
//! Human-readable run report.

use std::fmt::Write as _;

use crate::analyze::{AnalysisResult, RankedEntry};
use crate::config::Mode;
use crate::posting::Posting;

/// Display caps; the result may hold longer lists.
const TECH_ROWS: usize = 30;
const QUALIFICATION_ROWS: usize = 20;
const COMPANY_ROWS: usize = 15;
const SAMPLES: usize = 5;
const SAMPLE_TITLE_CHARS: usize = 50;
const SAMPLE_QUALIFICATION_CHARS: usize = 800;
const SAMPLE_PREFERRED_CHARS: usize = 500;

fn cut(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn cell(s: &str) -> String {
    s.replace('|', "\\|")
}

fn ranked_table(out: &mut String, rows: &[RankedEntry], limit: usize, result: &AnalysisResult) {
    if rows.is_empty() {
        out.push_str("_No data._\n");
        return;
    }
    out.push_str("| Rank | Technology | Count | Share |\n");
    out.push_str("|------|------------|-------|-------|\n");
    for (i, e) in rows.iter().take(limit).enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {:.1}% |",
            i + 1,
            cell(&e.name),
            e.count,
            result.percent(e.count)
        );
    }
}

/// `generated_at` is shown verbatim under the title.
pub fn render_markdown(
    result: &AnalysisResult,
    postings: &[Posting],
    mode: Mode,
    generated_at: &str,
) -> String {
    let detailed = mode == Mode::Detailed;
    let mut out = String::new();

    out.push_str(if detailed {
        "# Job Posting Analysis Report (Detailed)\n\n"
    } else {
        "# Job Posting Analysis Report\n\n"
    });
    let _ = writeln!(out, "Generated: {generated_at}\n");

    out.push_str("## Overview\n\n");
    let _ = writeln!(out, "- **Total postings**: {}", result.total);
    if detailed {
        let _ = writeln!(out, "- **With details**: {}", result.with_details);
    }
    for (source, count) in &result.by_source {
        let _ = writeln!(out, "- {source}: {count}");
    }

    out.push_str(if detailed {
        "\n## Technology Stack (detail text)\n\n"
    } else {
        "\n## Technology Stack\n\n"
    });
    ranked_table(&mut out, &result.technologies, TECH_ROWS, result);

    if let Some(q) = &result.qualification_technologies {
        out.push_str("\n## Technologies in Qualifications\n\n");
        ranked_table(&mut out, q, QUALIFICATION_ROWS, result);
    }

    out.push_str("\n## Most Active Companies\n\n");
    if result.companies.is_empty() {
        out.push_str("_No data._\n");
    }
    for e in result.companies.iter().take(COMPANY_ROWS) {
        if detailed {
            let _ = writeln!(out, "- **{}**: {}", e.name, e.count);
        } else {
            let _ = writeln!(out, "- {}: {}", e.name, e.count);
        }
    }

    if let Some(exp) = &result.experience {
        out.push_str("\n## Experience Requirements\n\n");
        if exp.is_empty() {
            out.push_str("_No data._\n");
        }
        for e in exp {
            let _ = writeln!(out, "- {}: {}", e.name, e.count);
        }
    }

    if detailed {
        out.push_str("\n## Qualification Samples\n\n");
        for p in postings
            .iter()
            .filter(|p| !p.qualifications.is_empty())
            .take(SAMPLES)
        {
            let _ = writeln!(
                out,
                "### {} - {}\n",
                p.company,
                cut(&p.title, SAMPLE_TITLE_CHARS)
            );
            let _ = writeln!(out, "**Tech stack**: {}\n", p.tech_stack.join(", "));
            let _ = writeln!(
                out,
                "**Qualifications**:\n```\n{}\n```\n",
                cut(&p.qualifications, SAMPLE_QUALIFICATION_CHARS)
            );
            if !p.preferred.is_empty() {
                let _ = writeln!(
                    out,
                    "**Preferred**:\n```\n{}\n```\n",
                    cut(&p.preferred, SAMPLE_PREFERRED_CHARS)
                );
            }
            out.push_str("---\n\n");
        }
    }

    out
}
