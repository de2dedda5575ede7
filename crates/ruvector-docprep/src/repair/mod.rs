//! Post-hoc syntax repair for persisted records
//!
//! Record files are consumed by an MDX renderer, which chokes on stray JSX
//! fragment markers and lone angle brackets left behind by crawled markup.
//! The repair is idempotent: running it over already repaired files changes
//! nothing.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::ingestion::list_files;
use crate::storage::write_atomic;

/// Named character references decoded by the repair, in order
const ENTITIES: [(&str, &str); 4] = [("&nbsp;", " "), ("&amp;", "&"), ("&lt;", "<"), ("&gt;", ">")];

/// Repair `content`, repeating until nothing changes
///
/// A single pass can expose new artifacts (`&amp;lt;` decodes to `&lt;`),
/// so passes are repeated until a fixed point. Every pass that changes the
/// text makes it shorter, which bounds the loop.
pub fn repair_text(content: &str) -> String {
    let mut current = content.to_string();
    loop {
        let next = repair_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// One sweep over every line
fn repair_pass(content: &str) -> String {
    let mut lines = Vec::new();

    for line in content.split('\n') {
        if is_fragment_marker(line) {
            continue;
        }

        let mut line = strip_trailing_fragment(line);
        for (entity, literal) in ENTITIES {
            if line.contains(entity) {
                line = line.replace(entity, literal);
            }
        }

        if is_lone_bracket(&line) {
            continue;
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// A line holding nothing but `<>` or `</>`
fn is_fragment_marker(line: &str) -> bool {
    matches!(line.trim(), "<>" | "</>")
}

/// Drop `<>` / `</>` (and trailing whitespace) from the end of a line
fn strip_trailing_fragment(line: &str) -> String {
    let mut rest = line.trim_end();
    while let Some(stripped) = rest.strip_suffix("<>").or_else(|| rest.strip_suffix("</>")) {
        rest = stripped.trim_end();
    }
    if rest.len() == line.trim_end().len() {
        line.to_string()
    } else {
        rest.to_string()
    }
}

fn is_lone_bracket(line: &str) -> bool {
    matches!(line.trim(), "<" | ">")
}

/// What the sweep did with one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairOutcome {
    Fixed,
    Unchanged,
}

/// Totals for one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairSummary {
    pub files_checked: usize,
    pub files_fixed: usize,
    pub files_unchanged: usize,
    pub files_failed: usize,
    /// Configured directories that did not exist
    pub directories_missing: usize,
}

/// Repair every record file in a set of output directories
pub struct RepairSweep {
    directories: Vec<PathBuf>,
    extension: String,
}

impl RepairSweep {
    /// Sweep `directories`, touching files with the given extension
    pub fn new(directories: Vec<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            directories,
            extension: extension.into(),
        }
    }

    /// Repair a single file in place
    pub async fn repair_file(path: &Path) -> Result<RepairOutcome> {
        let content = tokio::fs::read_to_string(path).await?;
        let fixed = repair_text(&content);

        if fixed == content {
            return Ok(RepairOutcome::Unchanged);
        }

        write_atomic(path, &fixed).await?;
        Ok(RepairOutcome::Fixed)
    }

    /// Run the sweep; per-file failures are logged and counted
    pub async fn run(&self) -> Result<RepairSummary> {
        let mut summary = RepairSummary::default();

        for dir in &self.directories {
            if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
                tracing::info!("Skipping non-existent directory: {}", dir.display());
                summary.directories_missing += 1;
                continue;
            }

            let mut files = list_files(dir, &self.extension).await?;
            files.sort();
            tracing::info!("Checking {} files in {}", files.len(), dir.display());

            for file in files {
                summary.files_checked += 1;
                match Self::repair_file(&file).await {
                    Ok(RepairOutcome::Fixed) => {
                        summary.files_fixed += 1;
                        tracing::info!("Fixed: {}", file.display());
                    }
                    Ok(RepairOutcome::Unchanged) => {
                        summary.files_unchanged += 1;
                        tracing::debug!("Unchanged: {}", file.display());
                    }
                    Err(e) => {
                        summary.files_failed += 1;
                        tracing::error!("Failed to repair {}: {}", file.display(), e);
                    }
                }
            }
        }

        tracing::info!(
            "Repair complete: {} fixed, {} unchanged, {} failed",
            summary.files_fixed,
            summary.files_unchanged,
            summary.files_failed
        );
        Ok(summary)
    }
}
