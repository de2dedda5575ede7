//! Turns cleaned sources into document records

use chrono::{DateTime, SecondsFormat, Utc};

use crate::cleaning::{normalize_pdf_text, BoilerplateFilter};
use crate::config::DocprepConfig;
use crate::types::{Category, DocumentRecord, RawPage, RawPdfExtract};

use super::identifier::{format_pdf_title, part_identifier, IdentifierStrategy};
use super::splitter::SectionSplitter;

/// Result of assembling one source
#[derive(Debug, Clone, PartialEq)]
pub enum Assembly {
    /// Cleaned body is below the minimum length; nothing to write
    TooShort { chars: usize },
    /// One record, or one per section
    Records(Vec<DocumentRecord>),
}

impl Assembly {
    /// Records produced, empty when the source was too short
    pub fn into_records(self) -> Vec<DocumentRecord> {
        match self {
            Assembly::TooShort { .. } => Vec::new(),
            Assembly::Records(records) => records,
        }
    }
}

/// Per-source fields computed once and shared by every part
struct SourceHeader {
    category: Category,
    identifier: String,
    title: String,
    source_ref: String,
    description: String,
    published_at: Option<String>,
    page_count: Option<u32>,
}

/// Builds document records for crawl pages and PDF extracts
pub struct DocumentAssembler {
    config: DocprepConfig,
    generated_at: DateTime<Utc>,
    boilerplate: BoilerplateFilter,
    splitter: SectionSplitter,
    page_ids: Box<dyn IdentifierStrategy>,
    pdf_ids: Box<dyn IdentifierStrategy>,
}

impl DocumentAssembler {
    /// Create an assembler stamping records with `generated_at`
    pub fn new(config: &DocprepConfig, generated_at: DateTime<Utc>) -> Self {
        Self {
            config: config.clone(),
            generated_at,
            boilerplate: BoilerplateFilter::default(),
            splitter: SectionSplitter::new(config.limits.max_section_chars),
            page_ids: Category::Crawl.strategy(&config.identity),
            pdf_ids: Category::Pdf.strategy(&config.identity),
        }
    }

    /// Assemble a crawled page; `index` is its position in the crawl result
    pub fn assemble_page(&self, page: &RawPage, index: usize) -> Assembly {
        let body = self.boilerplate.clean(&page.body);
        let meta = &page.metadata;
        let source_ref = meta.source_url.clone().unwrap_or_default();

        let header = SourceHeader {
            category: Category::Crawl,
            identifier: self.page_ids.identify(&source_ref),
            title: meta
                .title
                .clone()
                .unwrap_or_else(|| format!("{} Page {}", self.config.identity.site_name, index + 1)),
            source_ref,
            description: meta.description.clone().unwrap_or_default(),
            published_at: Some(meta.published_at.clone().unwrap_or_else(|| {
                self.generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
            })),
            page_count: None,
        };

        self.assemble(header, &body, self.config.limits.min_crawl_chars)
    }

    /// Assemble an extracted PDF
    pub fn assemble_pdf(&self, extract: &RawPdfExtract) -> Assembly {
        let body = normalize_pdf_text(&extract.body);

        let header = SourceHeader {
            category: Category::Pdf,
            identifier: self.pdf_ids.identify(&extract.source_filename),
            title: format_pdf_title(&extract.source_filename, &self.config.identity.title_acronyms),
            source_ref: extract.source_filename.clone(),
            description: format!(
                "Content extracted from {} ({} pages)",
                extract.source_filename, extract.page_count
            ),
            published_at: None,
            page_count: Some(extract.page_count),
        };

        self.assemble(header, &body, self.config.limits.min_pdf_chars)
    }

    fn assemble(&self, header: SourceHeader, body: &str, min_chars: usize) -> Assembly {
        let chars = body.chars().count();
        if chars < min_chars {
            return Assembly::TooShort { chars };
        }

        let sections = self.splitter.split(body);
        let total = sections.len();

        if total <= 1 {
            let body = sections.into_iter().next().unwrap_or_else(|| body.to_string());
            let record = self.record(
                &header,
                header.identifier.clone(),
                header.title.clone(),
                header.description.clone(),
                body,
                None,
            );
            return Assembly::Records(vec![record]);
        }

        let records = sections
            .into_iter()
            .enumerate()
            .map(|(i, section)| {
                let part = i + 1;
                let description = match header.category {
                    Category::Crawl => header.description.clone(),
                    Category::Pdf => format!(
                        "Part {} of {} from {} ({} pages total)",
                        part,
                        total,
                        header.source_ref,
                        header.page_count.unwrap_or(1)
                    ),
                };
                self.record(
                    &header,
                    part_identifier(&header.identifier, part),
                    format!("{} - Part {} of {}", header.title, part, total),
                    description,
                    section,
                    Some((part, total)),
                )
            })
            .collect();

        Assembly::Records(records)
    }

    fn record(
        &self,
        header: &SourceHeader,
        identifier: String,
        title: String,
        description: String,
        body: String,
        part: Option<(usize, usize)>,
    ) -> DocumentRecord {
        DocumentRecord {
            identifier,
            title,
            description,
            body,
            source_ref: header.source_ref.clone(),
            category: header.category,
            part_index: part.map(|(i, _)| i),
            part_count: part.map(|(_, n)| n),
            timestamp: self.generated_at,
            published_at: header.published_at.clone(),
            page_count: header.page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageMetadata;
    use chrono::TimeZone;

    fn assembler() -> DocumentAssembler {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        DocumentAssembler::new(&DocprepConfig::default(), at)
    }

    fn page(body: &str) -> RawPage {
        RawPage::new(
            body,
            PageMetadata {
                source_url: Some("https://hyrox.com/faq/".to_string()),
                title: Some("FAQ".to_string()),
                description: Some("Frequently asked".to_string()),
                published_at: None,
            },
        )
    }

    /// Six 998-char paragraphs and one of 1000, 7000 chars in total
    fn seven_thousand_chars() -> String {
        let mut parts: Vec<String> = (0..6u8)
            .map(|i| std::iter::repeat((b'a' + i) as char).take(998).collect())
            .collect();
        parts.push("g".repeat(1000));
        parts.join("\n\n")
    }

    #[test]
    fn test_short_page_skipped() {
        let body = "x".repeat(30);
        assert_eq!(assembler().assemble_page(&page(&body), 0), Assembly::TooShort { chars: 30 });
    }

    #[test]
    fn test_page_above_minimum_emits_one_record() {
        let body = "y".repeat(60);
        let records = assembler().assemble_page(&page(&body), 0).into_records();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.identifier, "hyrox-faq");
        assert_eq!(record.title, "FAQ");
        assert_eq!(record.description, "Frequently asked");
        assert_eq!(record.category, Category::Crawl);
        assert_eq!(record.part_index, None);
        assert_eq!(record.published_at.as_deref(), Some("2024-05-01T09:30:00.000Z"));
    }

    #[test]
    fn test_long_page_split_into_three_parts() {
        let body = seven_thousand_chars();
        assert_eq!(body.chars().count(), 7000);

        let records = assembler().assemble_page(&page(&body), 0).into_records();
        assert_eq!(records.len(), 3);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.part_index, Some(i + 1));
            assert_eq!(record.part_count, Some(3));
            assert!(record.identifier.ends_with(&format!("-part-{}", i + 1)));
            assert_eq!(record.title, format!("FAQ - Part {} of 3", i + 1));
            assert!(record.body.chars().count() <= 3000);
        }
    }

    #[test]
    fn test_untitled_page_defaults() {
        let mut p = page(&"z".repeat(80));
        p.metadata.title = None;
        p.metadata.source_url = Some("https://hyrox.com/".to_string());
        let records = assembler().assemble_page(&p, 4).into_records();
        assert_eq!(records[0].title, "Hyrox Page 5");
        assert_eq!(records[0].identifier, "hyrox-home");
    }

    #[test]
    fn test_boilerplate_counts_against_minimum() {
        let body = "We use cookies and similar technologies\nEssential\nShort text here.";
        assert!(matches!(
            assembler().assemble_page(&page(body), 0),
            Assembly::TooShort { .. }
        ));
    }

    #[test]
    fn test_pdf_single_record() {
        let extract = RawPdfExtract {
            body: format!("{}\n\n3\n\nPage 1 of 2", "Rule text. ".repeat(20)),
            page_count: 2,
            source_filename: "hyrox_rulebook-en.pdf".to_string(),
        };
        let records = assembler().assemble_pdf(&extract).into_records();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.identifier, "pdf-hyrox-rulebook-en");
        assert_eq!(record.title, "HYROX Rulebook EN");
        assert_eq!(record.description, "Content extracted from hyrox_rulebook-en.pdf (2 pages)");
        assert_eq!(record.page_count, Some(2));
        assert!(!record.body.contains("Page 1 of 2"));
        assert!(record.body.ends_with("Rule text."));
    }

    #[test]
    fn test_pdf_parts_describe_position() {
        let extract = RawPdfExtract {
            body: seven_thousand_chars(),
            page_count: 9,
            source_filename: "guide.pdf".to_string(),
        };
        let records = assembler().assemble_pdf(&extract).into_records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].identifier, "pdf-guide-part-2");
        assert_eq!(records[1].description, "Part 2 of 3 from guide.pdf (9 pages total)");
    }

    #[test]
    fn test_short_pdf_skipped() {
        let extract = RawPdfExtract {
            body: "1\n\n2\n\nCover".to_string(),
            page_count: 2,
            source_filename: "cover.pdf".to_string(),
        };
        assert_eq!(assembler().assemble_pdf(&extract), Assembly::TooShort { chars: 5 });
    }
}
