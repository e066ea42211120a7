//! Bulk import of JSON-bearing tabular rows.

use super::TelemetryIngestionService;
use crate::telemetry::{
    domain::{FailedImportRow, ImportReport, ListPolicy, TelemetryPayload},
    ports::{ImportFailureSink, TabularRow, TabularSource, TabularSourceError, TelemetryRepository},
};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Error message recorded for rows whose JSON cell is missing or not text.
pub const MISSING_JSON_MESSAGE: &str = "row has no JSON text";

/// Feeds tabular rows through the ingestion create path.
///
/// Rows are processed in order and each successful row is committed before
/// the next one is read. A row that cannot be parsed or ingested is recorded
/// in the returned [`ImportReport`] and the import carries on. List values
/// are exploded into one attribute row per element.
pub struct TelemetryImportService<R, C>
where
    R: TelemetryRepository,
    C: Clock + Send + Sync,
{
    ingestion: TelemetryIngestionService<R, C>,
    failure_sink: Option<Arc<dyn ImportFailureSink>>,
}

impl<R, C> Clone for TelemetryImportService<R, C>
where
    R: TelemetryRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            ingestion: self.ingestion.clone(),
            failure_sink: self.failure_sink.clone(),
        }
    }
}

impl<R, C> TelemetryImportService<R, C>
where
    R: TelemetryRepository,
    C: Clock + Send + Sync,
{
    /// Creates an import service over an ingestion coordinator.
    #[must_use]
    pub const fn new(ingestion: TelemetryIngestionService<R, C>) -> Self {
        Self {
            ingestion,
            failure_sink: None,
        }
    }

    /// Sets the sink that keeps a copy of skipped rows for operators.
    #[must_use]
    pub fn with_failure_sink(mut self, sink: Arc<dyn ImportFailureSink>) -> Self {
        self.failure_sink = Some(sink);
        self
    }

    /// Reads every row of a tabular source and imports it.
    ///
    /// # Errors
    ///
    /// Returns [`TabularSourceError`] when the source cannot be read as a
    /// whole. Row-level problems are reported in the [`ImportReport`].
    pub async fn import_source<S>(&self, source: &mut S) -> Result<ImportReport, TabularSourceError>
    where
        S: TabularSource + ?Sized,
    {
        let rows = source.json_rows()?;
        Ok(self.import_rows(rows).await)
    }

    /// Imports already-extracted tabular rows.
    pub async fn import_rows(&self, rows: Vec<TabularRow>) -> ImportReport {
        let mut report = ImportReport::default();

        for row in rows {
            match self.import_row(row).await {
                Ok(()) => report.processed_count += 1,
                Err(failure) => {
                    warn!(row = failure.row, error = %failure.error, "skipped import row");
                    report.failed_rows.push(failure);
                }
            }
        }

        if report.has_failures() {
            self.record_failures(&report.failed_rows).await;
        }
        info!(
            processed = report.processed_count,
            failed = report.failed_rows.len(),
            "finished telemetry import"
        );
        report
    }

    async fn import_row(&self, row: TabularRow) -> Result<(), FailedImportRow> {
        let TabularRow {
            row_number,
            json_cell,
        } = row;
        let Some(text) = json_cell else {
            return Err(failed_row(row_number, String::new(), MISSING_JSON_MESSAGE));
        };

        let value = match serde_json::from_str::<Value>(&text) {
            Ok(value) => value,
            Err(err) => return Err(failed_row(row_number, text, err)),
        };
        let payload = match TelemetryPayload::from_value(value) {
            Ok(payload) => payload,
            Err(err) => return Err(failed_row(row_number, text, err)),
        };

        self.ingestion
            .ingest_with_policy(payload, ListPolicy::Explode)
            .await
            .map(|_| ())
            .map_err(|err| failed_row(row_number, text, err))
    }

    async fn record_failures(&self, failures: &[FailedImportRow]) {
        let Some(sink) = self.failure_sink.clone() else {
            return;
        };
        let failures = failures.to_vec();
        let outcome = tokio::task::spawn_blocking(move || sink.record(&failures)).await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(error = %err, "could not write import failure report"),
            Err(err) => warn!(error = %err, "import failure report task did not complete"),
        }
    }
}

fn failed_row(row: usize, raw_text: String, error: impl ToString) -> FailedImportRow {
    FailedImportRow {
        row,
        raw_text,
        error: error.to_string(),
    }
}
