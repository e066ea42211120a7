//! JSON-lines report of rows skipped by a bulk import.

use crate::telemetry::{domain::FailedImportRow, ports::ImportFailureSink};
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;

/// File name of the report written into the report directory.
pub const FAILED_ROWS_FILE: &str = "failed_rows.jsonl";

/// Writes skipped import rows to `failed_rows.jsonl` in an operator
/// directory, one JSON object per line. Each import replaces the previous
/// report.
#[derive(Debug)]
pub struct JsonLinesFailureReport {
    dir: Dir,
}

impl JsonLinesFailureReport {
    /// Opens the report directory, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created or opened.
    pub fn open(path: &Utf8Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir })
    }
}

impl ImportFailureSink for JsonLinesFailureReport {
    fn record(&self, failures: &[FailedImportRow]) -> io::Result<()> {
        let mut contents = String::new();
        for failure in failures {
            let line = serde_json::to_string(failure).map_err(io::Error::other)?;
            contents.push_str(&line);
            contents.push('\n');
        }
        self.dir.write(FAILED_ROWS_FILE, contents)
    }
}
