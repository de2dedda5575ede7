//! Source readers: crawl result files and PDF text extraction

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{CrawlResult, RawPdfExtract};

/// Turns PDF bytes into raw text and a page count
///
/// Implementations:
/// - `NativePdfExtractor`: pdf-extract for text, lopdf for the page count
pub trait PdfExtractor: Send + Sync {
    /// Extract text from the PDF stored in `data`
    fn extract(&self, filename: &str, data: &[u8]) -> Result<RawPdfExtract>;

    /// Extractor name for logging
    fn name(&self) -> &str;
}

/// In-process extractor built on pdf-extract and lopdf
#[cfg(feature = "pdf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct NativePdfExtractor;

#[cfg(feature = "pdf")]
impl PdfExtractor for NativePdfExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Result<RawPdfExtract> {
        let body = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let page_count = match lopdf::Document::load_mem(data) {
            Ok(doc) => doc.get_pages().len() as u32,
            Err(e) => {
                tracing::debug!("lopdf could not count pages of '{}': {}", filename, e);
                1
            }
        };

        Ok(RawPdfExtract {
            body,
            page_count,
            source_filename: filename.to_string(),
        })
    }

    fn name(&self) -> &str {
        "native"
    }
}

/// Most recent crawl result in `dir`
///
/// Crawl files carry a timestamp in their name, so the lexicographically
/// greatest `*.json` file is the latest one.
pub async fn latest_crawl_file(dir: &Path) -> Result<PathBuf> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Err(Error::source_missing(format!(
            "crawl data directory not found: {}",
            dir.display()
        )));
    }

    let mut candidates = list_files(dir, "json").await?;
    candidates.sort();
    candidates.pop().ok_or_else(|| {
        Error::source_missing(format!("no crawl data files in {}", dir.display()))
    })
}

/// Parse a crawl result file
pub async fn read_crawl_result(path: &Path) -> Result<CrawlResult> {
    let raw = tokio::fs::read_to_string(path).await?;
    let result: CrawlResult = serde_json::from_str(&raw)?;

    if result.data.is_empty() {
        return Err(Error::source_empty(format!(
            "no pages found in {}",
            path.display()
        )));
    }

    Ok(result)
}

/// PDF files in `dir`, sorted by name
pub async fn list_pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Err(Error::source_missing(format!(
            "PDF directory not found: {}",
            dir.display()
        )));
    }

    let mut files = list_files(dir, "pdf").await?;
    if files.is_empty() {
        return Err(Error::source_missing(format!("no PDF files in {}", dir.display())));
    }
    files.sort();
    Ok(files)
}

/// Regular files in `dir` whose extension matches `extension` case-insensitively
pub(crate) async fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(extension))
            .unwrap_or(false);

        if matches && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }

    Ok(files)
}
