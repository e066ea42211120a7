//! Adapter implementations for telemetry persistence and import ports.

pub mod memory;
pub mod postgres;

mod failure_report;
mod spreadsheet;

pub use failure_report::{FAILED_ROWS_FILE, JsonLinesFailureReport};
pub use spreadsheet::SpreadsheetSource;
