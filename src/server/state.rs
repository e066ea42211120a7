//! Shared state handed to every HTTP handler.

use super::config::CriticalPointPaging;
use crate::critical_point::{
    ports::CriticalPointRepository, services::CriticalPointRegistryService,
};
use crate::telemetry::{
    ports::TelemetryRepository,
    services::{TelemetryImportService, TelemetryIngestionService},
};
use mockable::Clock;

/// Services reachable from the router.
///
/// Generic over the repositories so the same router serves `PostgreSQL` in
/// production and the in-memory adapters in tests.
pub struct AppState<T, P, C>
where
    T: TelemetryRepository,
    P: CriticalPointRepository,
    C: Clock + Send + Sync,
{
    /// Telemetry ingestion and query service.
    pub ingestion: TelemetryIngestionService<T, C>,
    /// Spreadsheet import service.
    pub import: TelemetryImportService<T, C>,
    /// Critical point registry service.
    pub critical_points: CriticalPointRegistryService<P, C>,
    /// Critical point listing bounds.
    pub paging: CriticalPointPaging,
}

impl<T, P, C> Clone for AppState<T, P, C>
where
    T: TelemetryRepository,
    P: CriticalPointRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            ingestion: self.ingestion.clone(),
            import: self.import.clone(),
            critical_points: self.critical_points.clone(),
            paging: self.paging,
        }
    }
}

impl<T, P, C> AppState<T, P, C>
where
    T: TelemetryRepository,
    P: CriticalPointRepository,
    C: Clock + Send + Sync,
{
    /// Bundles the services into router state.
    #[must_use]
    pub const fn new(
        ingestion: TelemetryIngestionService<T, C>,
        import: TelemetryImportService<T, C>,
        critical_points: CriticalPointRegistryService<P, C>,
        paging: CriticalPointPaging,
    ) -> Self {
        Self {
            ingestion,
            import,
            critical_points,
            paging,
        }
    }
}
