//! Text cleaning for crawled markdown and PDF-extracted text

pub mod boilerplate;
pub mod pdf_text;

use once_cell::sync::Lazy;
use regex::Regex;

pub use boilerplate::{BoilerplateFilter, LineRule, Verdict};
pub use pdf_text::normalize_pdf_text;

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("Invalid regex"));

/// Collapse every run of three or more newlines to a single blank line
pub fn collapse_blank_runs(text: &str) -> String {
    BLANK_RUN.replace_all(text, "\n\n").into_owned()
}
