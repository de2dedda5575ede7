//! Stable, filesystem-safe identifiers derived from source URLs and filenames

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

use crate::config::IdentityConfig;
use crate::types::Category;

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9-]").expect("Invalid regex"));
static NON_ALNUM_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex"));
static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").expect("Invalid regex"));
static WORD_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w").expect("Invalid regex"));

/// Derives the identifier of a source
///
/// The same input must always produce the same identifier so that
/// re-running a conversion overwrites earlier output instead of duplicating it.
pub trait IdentifierStrategy: Send + Sync {
    /// Identifier for `source` (a URL or a file name)
    fn identify(&self, source: &str) -> String;

    /// Strategy name for logging
    fn name(&self) -> &str;
}

/// `<tag>-<path-slug>` from a page URL
///
/// Sources without a usable URL get `<tag>-page-<unix millis>-<n>`, where `n`
/// counts fallbacks handed out by this strategy, so they never share an
/// identifier within a run.
#[derive(Debug)]
pub struct UrlSlugStrategy {
    tag: String,
    fallbacks: AtomicUsize,
}

impl UrlSlugStrategy {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            fallbacks: AtomicUsize::new(0),
        }
    }

    /// Slug for the URL path, `None` when the URL cannot be parsed
    pub fn path_slug(url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let path = parsed.path().trim_matches('/').replace('/', "-").to_lowercase();
        let slug = NON_SLUG.replace_all(&path, "-");
        let slug = HYPHEN_RUN.replace_all(&slug, "-");
        let slug = slug.trim_matches('-');

        if slug.is_empty() {
            Some("home".to_string())
        } else {
            Some(slug.to_string())
        }
    }
}

impl IdentifierStrategy for UrlSlugStrategy {
    fn identify(&self, source: &str) -> String {
        match Self::path_slug(source) {
            Some(slug) => format!("{}-{}", self.tag, slug),
            None => {
                let millis = chrono::Utc::now().timestamp_millis();
                let n = self.fallbacks.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(
                    "Unparseable source URL '{}', using time-based identifier",
                    source
                );
                format!("{}-page-{}-{}", self.tag, millis, n)
            }
        }
    }

    fn name(&self) -> &str {
        "url-slug"
    }
}

/// `<tag>-<stem-slug>` from a file name
#[derive(Debug, Clone)]
pub struct FilenameSlugStrategy {
    tag: String,
}

impl FilenameSlugStrategy {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl IdentifierStrategy for FilenameSlugStrategy {
    fn identify(&self, source: &str) -> String {
        let stem = file_stem(source).to_lowercase();
        let slug = NON_ALNUM_RUN.replace_all(&stem, "-");
        let slug = slug.trim_matches('-');
        if slug.is_empty() {
            format!("{}-document", self.tag)
        } else {
            format!("{}-{}", self.tag, slug)
        }
    }

    fn name(&self) -> &str {
        "filename-slug"
    }
}

impl Category {
    /// Identifier strategy used for sources of this category
    pub fn strategy(&self, identity: &IdentityConfig) -> Box<dyn IdentifierStrategy> {
        match self {
            Category::Crawl => Box::new(UrlSlugStrategy::new(&identity.site_tag)),
            Category::Pdf => Box::new(FilenameSlugStrategy::new(&identity.pdf_tag)),
        }
    }
}

/// Identifier of part `index` (1-based) of a split source
pub fn part_identifier(base: &str, index: usize) -> String {
    format!("{}-part-{}", base, index)
}

/// File name without directory and extension
fn file_stem(source: &str) -> &str {
    Path::new(source)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(source)
}

/// Display title derived from a PDF file name
///
/// `hyrox_rulebook-en.pdf` becomes `HYROX Rulebook EN` with the default acronyms.
pub fn format_pdf_title(filename: &str, acronyms: &[String]) -> String {
    let spaced = file_stem(filename).replace(['_', '-'], " ");
    let mut title = WORD_START
        .replace_all(&spaced, |caps: &regex::Captures| caps[0].to_uppercase())
        .into_owned();

    for acronym in acronyms {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(acronym));
        if let Ok(re) = Regex::new(&pattern) {
            title = re.replace_all(&title, acronym.as_str()).into_owned();
        }
    }

    title
}
