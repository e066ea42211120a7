//! Ports for tabular import sources and import failure reporting.

use crate::telemetry::domain::FailedImportRow;
use std::sync::Arc;
use thiserror::Error;

/// Header of the column that carries one JSON payload per row.
pub const JSON_COLUMN: &str = "JSON";

/// One data row of a tabular import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularRow {
    /// One-based row number in the source file, counting the header.
    pub row_number: usize,
    /// Text held in the JSON column, or `None` when the cell is missing,
    /// empty, or not text.
    pub json_cell: Option<String>,
}

impl TabularRow {
    /// Creates a tabular row.
    #[must_use]
    pub fn new(row_number: usize, json_cell: Option<String>) -> Self {
        Self {
            row_number,
            json_cell,
        }
    }
}

/// Source of JSON-bearing rows, such as a spreadsheet.
pub trait TabularSource {
    /// Reads every data row of the source.
    ///
    /// # Errors
    ///
    /// Returns [`TabularSourceError`] when the source cannot be parsed as a
    /// whole. Problems local to one row are reported through
    /// [`TabularRow::json_cell`] instead.
    fn json_rows(&mut self) -> Result<Vec<TabularRow>, TabularSourceError>;
}

/// Errors returned by tabular sources.
#[derive(Debug, Clone, Error)]
pub enum TabularSourceError {
    /// The file holds no worksheet.
    #[error("the workbook does not contain any worksheet")]
    NoWorksheet,

    /// The header row has no JSON column.
    #[error("the header row has no 'JSON' column")]
    MissingJsonColumn,

    /// The file could not be read or parsed.
    #[error("unreadable tabular file: {0}")]
    Unreadable(Arc<dyn std::error::Error + Send + Sync>),
}

impl TabularSourceError {
    /// Wraps a parser failure.
    pub fn unreadable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unreadable(Arc::new(err))
    }
}

/// Destination for rows that failed to import, kept for operator review.
pub trait ImportFailureSink: Send + Sync {
    /// Records the failed rows of one import.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the report cannot be written.
    fn record(&self, failures: &[FailedImportRow]) -> std::io::Result<()>;
}
