//! Outcome of a bulk import.

use serde::{Deserialize, Serialize};

/// One import row that could not be ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedImportRow {
    /// One-based row number in the source file.
    pub row: usize,
    /// Text of the JSON cell, empty when the cell was missing.
    pub raw_text: String,
    /// Human-readable reason the row was skipped.
    pub error: String,
}

/// Summary of a bulk import: partial success is the normal outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportReport {
    /// Number of rows ingested.
    pub processed_count: usize,
    /// Rows that were skipped, in file order.
    pub failed_rows: Vec<FailedImportRow>,
}

impl ImportReport {
    /// Returns `true` when at least one row was skipped.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed_rows.is_empty()
    }
}
