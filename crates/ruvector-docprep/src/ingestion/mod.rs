//! Ingestion pipeline: source readers, identifiers, splitting and assembly

mod assembler;
pub mod identifier;
mod parser;
mod processor;
mod splitter;

pub use assembler::{Assembly, DocumentAssembler};
pub use identifier::{
    format_pdf_title, part_identifier, FilenameSlugStrategy, IdentifierStrategy, UrlSlugStrategy,
};
#[cfg(feature = "pdf")]
pub use parser::NativePdfExtractor;
pub use parser::{latest_crawl_file, list_pdf_files, read_crawl_result, PdfExtractor};
pub(crate) use parser::list_files;
pub use processor::ConversionRun;
pub use splitter::{SectionSplitter, PARAGRAPH_SEPARATOR};
