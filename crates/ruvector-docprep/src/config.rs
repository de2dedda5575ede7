//! Configuration for the document preparation pipeline

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocprepConfig {
    /// Input and output directories
    #[serde(default)]
    pub paths: PathsConfig,
    /// Length thresholds
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Identifier and title settings
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl DocprepConfig {
    /// Load configuration from a TOML file
    ///
    /// Missing sections fall back to their defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve every relative directory against `root`
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = root.join(&*p);
            }
        };
        resolve(&mut self.paths.crawl_input_dir);
        resolve(&mut self.paths.pdf_input_dir);
        resolve(&mut self.paths.crawl_output_dir);
        resolve(&mut self.paths.pdf_output_dir);
        self
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_section_chars == 0 {
            return Err(Error::Config("limits.max_section_chars must be > 0".into()));
        }
        if self.output.extension.is_empty() || self.output.extension.contains('.') {
            return Err(Error::Config(format!(
                "output.extension must be a bare extension, got '{}'",
                self.output.extension
            )));
        }
        if self.identity.site_tag.is_empty() || self.identity.pdf_tag.is_empty() {
            return Err(Error::Config("identity tags must not be empty".into()));
        }
        Ok(())
    }
}

/// Directory layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding timestamped crawl result JSON files
    pub crawl_input_dir: PathBuf,
    /// Directory holding source PDFs
    pub pdf_input_dir: PathBuf,
    /// Output directory for crawl-derived records
    pub crawl_output_dir: PathBuf,
    /// Output directory for PDF-derived records
    pub pdf_output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            crawl_input_dir: PathBuf::from("data").join("hyrox-crawl"),
            pdf_input_dir: PathBuf::from("pages").join("docs").join("pdfs"),
            crawl_output_dir: PathBuf::from("pages").join("docs").join("hyrox"),
            pdf_output_dir: PathBuf::from("pages").join("docs").join("pdf-content"),
        }
    }
}

/// Length thresholds, in characters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Crawl pages shorter than this after cleaning are skipped
    pub min_crawl_chars: usize,
    /// PDFs shorter than this after cleaning are skipped
    pub min_pdf_chars: usize,
    /// Upper bound for a single section
    pub max_section_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_crawl_chars: 50,
            min_pdf_chars: 100,
            max_section_chars: 3000,
        }
    }
}

/// Identifier and title settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Prefix for URL-derived identifiers
    pub site_tag: String,
    /// Display name used for untitled pages ("<name> Page 3")
    pub site_name: String,
    /// Prefix for filename-derived identifiers
    pub pdf_tag: String,
    /// Words forced to upper case in titles derived from filenames
    pub title_acronyms: Vec<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            site_tag: "hyrox".to_string(),
            site_name: "Hyrox".to_string(),
            pdf_tag: "pdf".to_string(),
            title_acronyms: vec!["EN".to_string(), "PDF".to_string(), "HYROX".to_string()],
        }
    }
}

/// Output file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Extension of record files (without the dot)
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: "mdx".to_string(),
        }
    }
}
