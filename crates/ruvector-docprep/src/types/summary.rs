//! Per-run tallies

use serde::{Deserialize, Serialize};

use super::Category;

/// What happened to a single source during a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceOutcome {
    /// All records for the source were written
    Converted { records: usize },
    /// Some records were written, some failed
    Partial { written: usize, failed: usize },
    /// Cleaned body fell below the minimum length
    TooShort { chars: usize },
    /// The source could not be read or extracted
    Failed { message: String },
}

/// Counters owned by one conversion run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    pub category: Category,
    /// Sources handed to the run
    pub sources_seen: usize,
    /// Sources with at least one record written
    pub sources_converted: usize,
    /// Sources skipped as too short
    pub sources_skipped: usize,
    /// Sources that could not be read or extracted
    pub sources_failed: usize,
    pub records_written: usize,
    pub write_failures: usize,
}

impl RunSummary {
    /// Fresh, zeroed counters
    pub fn new(category: Category) -> Self {
        Self {
            category,
            sources_seen: 0,
            sources_converted: 0,
            sources_skipped: 0,
            sources_failed: 0,
            records_written: 0,
            write_failures: 0,
        }
    }

    /// Fold one source outcome into the tallies
    pub fn record(&mut self, outcome: &SourceOutcome) {
        self.sources_seen += 1;
        match outcome {
            SourceOutcome::Converted { records } => {
                self.sources_converted += 1;
                self.records_written += records;
            }
            SourceOutcome::Partial { written, failed } => {
                if *written > 0 {
                    self.sources_converted += 1;
                } else {
                    self.sources_failed += 1;
                }
                self.records_written += written;
                self.write_failures += failed;
            }
            SourceOutcome::TooShort { .. } => self.sources_skipped += 1,
            SourceOutcome::Failed { .. } => self.sources_failed += 1,
        }
    }

    /// Whether anything went wrong during the run
    pub fn has_failures(&self) -> bool {
        self.sources_failed > 0 || self.write_failures > 0
    }
}
