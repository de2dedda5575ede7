//! ruvector-docprep: turns crawled pages and PDFs into retrieval-ready records
//!
//! Crawled markdown is stripped of consent banners, PDF text is cleaned of
//! page-number artifacts, long bodies are split at paragraph boundaries and
//! every piece is written as a self-describing record keyed by a stable
//! identifier. A separate repair sweep fixes markup artifacts in records that
//! were already written.

pub mod cleaning;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod repair;
pub mod storage;
pub mod types;

pub use config::DocprepConfig;
pub use error::{Error, Result};
pub use ingestion::{Assembly, ConversionRun, DocumentAssembler, PdfExtractor, SectionSplitter};
pub use repair::{repair_text, RepairSummary, RepairSweep};
pub use types::{Category, DocumentRecord, RawPage, RawPdfExtract, RunSummary};
