//! Core types for the pipeline

pub mod document;
pub mod summary;

pub use document::{Category, CrawlResult, DocumentRecord, PageMetadata, RawPage, RawPdfExtract};
pub use summary::{RunSummary, SourceOutcome};
