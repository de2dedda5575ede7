//! Conversion run orchestration

use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;

use crate::config::DocprepConfig;
use crate::error::{Error, Result};
use crate::storage::RecordStore;
use crate::types::{Category, RawPage, RawPdfExtract, RunSummary, SourceOutcome};

use super::assembler::{Assembly, DocumentAssembler};
use super::parser::{latest_crawl_file, list_pdf_files, read_crawl_result, PdfExtractor};

/// One conversion invocation
///
/// Stamps every record with one generation timestamp and hands out fresh
/// counters for every conversion it runs. Sources are processed one at a time; each is cleaned,
/// split, assembled and written before the next one is read.
pub struct ConversionRun<'a> {
    config: &'a DocprepConfig,
    assembler: DocumentAssembler,
}

impl<'a> ConversionRun<'a> {
    /// Start a run stamped with the current time
    pub fn new(config: &'a DocprepConfig) -> Self {
        Self::at(config, Utc::now())
    }

    /// Start a run stamped with `generated_at`
    pub fn at(config: &'a DocprepConfig, generated_at: DateTime<Utc>) -> Self {
        Self {
            config,
            assembler: DocumentAssembler::new(config, generated_at),
        }
    }

    fn store(&self, category: Category) -> RecordStore {
        let dir = match category {
            Category::Crawl => &self.config.paths.crawl_output_dir,
            Category::Pdf => &self.config.paths.pdf_output_dir,
        };
        RecordStore::new(dir, &self.config.output.extension)
    }

    /// Convert the latest crawl result into records
    pub async fn convert_crawl(&self) -> Result<RunSummary> {
        let latest = latest_crawl_file(&self.config.paths.crawl_input_dir).await?;
        tracing::info!("Reading crawl data from: {}", latest.display());

        let crawl = read_crawl_result(&latest).await?;
        tracing::info!("Found {} pages to convert", crawl.data.len());

        self.convert_pages(&crawl.data).await
    }

    /// Convert already-loaded crawl pages into records
    pub async fn convert_pages(&self, pages: &[RawPage]) -> Result<RunSummary> {
        let store = self.store(Category::Crawl);
        store.ensure_dir().await?;

        let mut summary = RunSummary::new(Category::Crawl);
        for (index, page) in pages.iter().enumerate() {
            let label = page
                .metadata
                .source_url
                .clone()
                .unwrap_or_else(|| format!("page #{}", index + 1));
            let assembly = self.assembler.assemble_page(page, index);
            let outcome = persist(&store, assembly, &label).await;
            summary.record(&outcome);
        }

        log_summary(&summary, store.dir());
        Ok(summary)
    }

    /// Convert every PDF in the input directory into records
    pub async fn convert_pdfs(&self, extractor: Arc<dyn PdfExtractor>) -> Result<RunSummary> {
        let files = list_pdf_files(&self.config.paths.pdf_input_dir).await?;
        tracing::info!(
            "Found {} PDF files to convert ({} extractor)",
            files.len(),
            extractor.name()
        );

        let store = self.store(Category::Pdf);
        store.ensure_dir().await?;

        let mut summary = RunSummary::new(Category::Pdf);
        for path in files {
            let label = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            tracing::info!("Processing: {}", label);

            let outcome = match extract(extractor.clone(), &path).await {
                Ok(raw) => persist(&store, self.assembler.assemble_pdf(&raw), &label).await,
                Err(e) => {
                    tracing::error!("Failed to process {}: {}", label, e);
                    SourceOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            };
            summary.record(&outcome);
        }

        log_summary(&summary, store.dir());
        Ok(summary)
    }
}

/// Read a PDF and run the extractor on the blocking pool
async fn extract(extractor: Arc<dyn PdfExtractor>, path: &Path) -> Result<RawPdfExtract> {
    let data = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::file_parse(path.display().to_string(), "path has no file name"))?;

    tokio::task::spawn_blocking(move || extractor.extract(&filename, &data))
        .await
        .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))?
}

/// Write every record of an assembly; failures are logged and counted
async fn persist(store: &RecordStore, assembly: Assembly, label: &str) -> SourceOutcome {
    let records = match assembly {
        Assembly::TooShort { chars } => {
            tracing::warn!("Skipped (too little content, {} chars): {}", chars, label);
            return SourceOutcome::TooShort { chars };
        }
        Assembly::Records(records) => records,
    };

    let mut written = 0;
    let mut failed = 0;
    for record in &records {
        match store.write(record).await {
            Ok(path) => {
                written += 1;
                tracing::info!("Created: {}", path.display());
            }
            Err(e) => {
                failed += 1;
                tracing::error!("Failed to write {}: {}", record.identifier, e);
            }
        }
    }

    if failed == 0 {
        SourceOutcome::Converted { records: written }
    } else {
        SourceOutcome::Partial { written, failed }
    }
}

fn log_summary(summary: &RunSummary, output_dir: &Path) {
    tracing::info!(
        "{} conversion complete: {} converted, {} skipped (too little content), {} failed, {} records written to {}",
        summary.category,
        summary.sources_converted,
        summary.sources_skipped,
        summary.sources_failed,
        summary.records_written,
        output_dir.display()
    );
    if summary.write_failures > 0 {
        tracing::warn!("{} records could not be written", summary.write_failures);
    }
}
