//! Spreadsheet-backed tabular source.
//!
//! Reads the first worksheet of an `xlsx`, `xls`, `xlsb`, or `ods` workbook.
//! The first row is the header; the column titled `JSON` carries one payload
//! per data row.

use crate::telemetry::ports::{JSON_COLUMN, TabularRow, TabularSource, TabularSourceError};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;

/// Tabular source over an in-memory spreadsheet file.
#[derive(Debug, Clone)]
pub struct SpreadsheetSource {
    bytes: Vec<u8>,
}

impl SpreadsheetSource {
    /// Wraps the raw bytes of an uploaded workbook.
    #[must_use]
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl TabularSource for SpreadsheetSource {
    fn json_rows(&mut self) -> Result<Vec<TabularRow>, TabularSourceError> {
        let cursor = Cursor::new(std::mem::take(&mut self.bytes));
        let mut workbook =
            open_workbook_auto_from_rs(cursor).map_err(TabularSourceError::unreadable)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(TabularSourceError::NoWorksheet)?
            .map_err(TabularSourceError::unreadable)?;

        let mut rows = range.rows();
        let header = rows.next().ok_or(TabularSourceError::MissingJsonColumn)?;
        let json_index = header
            .iter()
            .position(|cell| matches!(cell, Data::String(title) if title.trim() == JSON_COLUMN))
            .ok_or(TabularSourceError::MissingJsonColumn)?;

        let first_row_number = usize::try_from(range.start().map_or(0, |(row, _)| row))
            .map_err(TabularSourceError::unreadable)?
            + 1;

        Ok(rows
            .enumerate()
            .map(|(offset, cells)| {
                // Header occupies `first_row_number`; data starts one below.
                let row_number = first_row_number + offset + 1;
                TabularRow::new(row_number, cells.get(json_index).and_then(json_text))
            })
            .collect())
    }
}

fn json_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(text) if !text.trim().is_empty() => Some(text.clone()),
        _ => None,
    }
}
