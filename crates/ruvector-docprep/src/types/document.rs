//! Source and record types

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Which collaborator a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Crawled web page
    Crawl,
    /// Extracted PDF document
    Pdf,
}

impl Category {
    /// Lowercase label used in metadata and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Crawl => "crawl",
            Category::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to a crawled page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetadata {
    pub source_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
}

/// A crawled page as handed over by the crawler
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "WirePage")]
pub struct RawPage {
    /// Markdown body
    pub body: String,
    pub metadata: PageMetadata,
}

impl RawPage {
    /// Create a page from a body and metadata
    pub fn new(body: impl Into<String>, metadata: PageMetadata) -> Self {
        Self {
            body: body.into(),
            metadata,
        }
    }
}

/// Crawler output file: `{ "data": [ page, ... ] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlResult {
    #[serde(default)]
    pub data: Vec<RawPage>,
}

/// Page layout as written by the crawler
///
/// The crawler reports several spellings for the same fact; the first
/// non-empty one wins.
#[derive(Debug, Default, Deserialize)]
struct WirePage {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    metadata: WireMetadata,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMetadata {
    #[serde(rename = "sourceURL")]
    source_url: Option<String>,
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
    og_description: Option<String>,
    published_time: Option<String>,
    modified_time: Option<String>,
}

fn first_present(candidates: [Option<String>; 2]) -> Option<String> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}

impl From<WirePage> for RawPage {
    fn from(wire: WirePage) -> Self {
        let m = wire.metadata;
        Self {
            body: wire.markdown.unwrap_or_default(),
            metadata: PageMetadata {
                source_url: first_present([m.source_url, m.url]),
                title: m.title.filter(|s| !s.is_empty()),
                description: first_present([m.description, m.og_description]),
                published_at: first_present([m.published_time, m.modified_time]),
            },
        }
    }
}

/// Text extracted from one PDF file
#[derive(Debug, Clone, PartialEq)]
pub struct RawPdfExtract {
    pub body: String,
    pub page_count: u32,
    /// File name without directory
    pub source_filename: String,
}

/// The persisted output unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRecord {
    /// Stable identifier, also the output file stem
    pub identifier: String,
    pub title: String,
    pub description: String,
    /// Normalized body or one section of it
    pub body: String,
    /// Source URL (crawl) or file name (pdf)
    pub source_ref: String,
    pub category: Category,
    /// 1-based part number for multi-part sources
    pub part_index: Option<usize>,
    pub part_count: Option<usize>,
    /// Generation time
    pub timestamp: DateTime<Utc>,
    /// Publication date reported by the crawler
    pub published_at: Option<String>,
    /// Total pages of the source PDF
    pub page_count: Option<u32>,
}

/// Metadata block serialized at the top of each record file
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordMeta<'a> {
    title: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    published_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_pages: Option<u32>,
    category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    part: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_parts: Option<usize>,
    generated_date: String,
}

impl DocumentRecord {
    /// Human-readable source citation lines
    pub fn format_citation(&self) -> Vec<String> {
        let date = self.timestamp.format("%Y-%m-%d");
        match self.category {
            Category::Crawl => vec![
                format!("*Source: [{0}]({0})*", self.source_ref),
                format!("*Crawled on: {}*", date),
            ],
            Category::Pdf => {
                let mut lines = vec![format!("*Source: {}*", self.source_ref)];
                if let Some(pages) = self.page_count {
                    lines.push(format!("*Total Pages: {}*", pages));
                }
                if let (Some(part), Some(total)) = (self.part_index, self.part_count) {
                    lines.push(format!("*Part {} of {}*", part, total));
                }
                lines.push(format!("*Extracted on: {}*", date));
                lines
            }
        }
    }

    /// Render the record as a metadata header, heading, body and footer
    pub fn render(&self) -> String {
        let meta = RecordMeta {
            title: &self.title,
            description: &self.description,
            source_url: (self.category == Category::Crawl).then_some(self.source_ref.as_str()),
            source_file: (self.category == Category::Pdf).then_some(self.source_ref.as_str()),
            published_date: self.published_at.as_deref(),
            total_pages: self.page_count,
            category: self.category,
            part: self.part_index,
            total_parts: self.part_count,
            generated_date: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        // Serializing a plain struct of strings and integers cannot fail
        let meta_json = serde_json::to_string_pretty(&meta).unwrap_or_else(|_| "{}".to_string());

        let mut out = String::with_capacity(self.body.len() + 512);
        out.push_str("export const meta = ");
        out.push_str(&meta_json);
        out.push_str("\n\n# ");
        out.push_str(&self.title);
        out.push_str("\n\n");
        if !self.description.is_empty() {
            out.push('*');
            out.push_str(&self.description);
            out.push_str("*\n\n");
        }
        out.push_str(&self.body);
        out.push_str("\n\n---\n\n");
        out.push_str(&self.format_citation().join("\n"));
        out.push('\n');
        out
    }
}
