//! Cleanup of raw PDF-extracted text

use once_cell::sync::Lazy;
use regex::Regex;

use super::collapse_blank_runs;

static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("Invalid regex"));
static PAGE_OF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Page [0-9]+ of [0-9]+$").expect("Invalid regex"));

/// Normalize text produced by the PDF extractor
///
/// Running headers and footers other than page numbers are left in place.
pub fn normalize_pdf_text(raw: &str) -> String {
    let spaced = SPACE_RUN.replace_all(raw, " ");
    let collapsed = collapse_blank_runs(&spaced);

    let lines: Vec<&str> = collapsed
        .split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if is_page_artifact(trimmed) {
                ""
            } else {
                trimmed
            }
        })
        .collect();

    collapse_blank_runs(&lines.join("\n")).trim().to_string()
}

/// Bare page numbers and "Page n of m" footers
fn is_page_artifact(trimmed: &str) -> bool {
    let bare_number = !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit());
    bare_number || PAGE_OF.is_match(trimmed)
}
