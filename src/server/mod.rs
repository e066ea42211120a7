//! HTTP surface for hostwatch.
//!
//! The router is generic over its repositories: [`Server`] wires the
//! `PostgreSQL` adapters, while tests can mount [`router`] over the in-memory
//! adapters.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod state;

use self::{
    config::AppConfig,
    handlers::{critical_points, telemetry},
    state::AppState,
};
use crate::critical_point::{
    adapters::postgres::PostgresCriticalPointRepository, ports::CriticalPointRepository,
    services::CriticalPointRegistryService,
};
use crate::telemetry::{
    adapters::{JsonLinesFailureReport, postgres::PostgresTelemetryRepository},
    ports::{ImportFailureSink, TelemetryRepository},
    services::{TelemetryImportService, TelemetryIngestionService},
};
use anyhow::Context;
use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

type ProductionState =
    AppState<PostgresTelemetryRepository, PostgresCriticalPointRepository, DefaultClock>;

/// Builds the router over the given state.
#[must_use]
pub fn router<T, P, C>(state: AppState<T, P, C>) -> Router
where
    T: TelemetryRepository + 'static,
    P: CriticalPointRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/healthz", get(health))
        .route("/post-data/", post(telemetry::post_data::<T, P, C>))
        .route("/update-data/:host", put(telemetry::update_data::<T, P, C>))
        .route("/get-data/:host", get(telemetry::get_data::<T, P, C>))
        .route(
            "/get-filtered-system-info/",
            get(telemetry::get_filtered_system_info::<T, P, C>),
        )
        .route("/delete-data/:host", delete(telemetry::delete_data::<T, P, C>))
        .route(
            "/delete-all-data/",
            delete(telemetry::delete_all_data::<T, P, C>),
        )
        .route("/upload-excel/", post(telemetry::upload_excel::<T, P, C>))
        .route(
            "/critical-points/",
            post(critical_points::create::<T, P, C>).get(critical_points::list::<T, P, C>),
        )
        .route(
            "/critical-points/:param",
            put(critical_points::update::<T, P, C>).delete(critical_points::delete::<T, P, C>),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// HTTP server bound to the `PostgreSQL` repositories.
pub struct Server {
    config: Arc<AppConfig>,
    state: ProductionState,
}

impl Server {
    /// Connects to the database and assembles the services.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection pool cannot be built or the
    /// import failure report directory cannot be opened.
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect_pool(&config).await?;
        let clock = Arc::new(DefaultClock);

        let ingestion = TelemetryIngestionService::new(
            Arc::new(PostgresTelemetryRepository::new(pool.clone())),
            Arc::clone(&clock),
        );
        let mut import = TelemetryImportService::new(ingestion.clone());
        if let Some(dir) = &config.failed_rows_dir {
            let report = JsonLinesFailureReport::open(dir)
                .with_context(|| format!("failed to open import report directory {dir}"))?;
            import = import.with_failure_sink(Arc::new(report) as Arc<dyn ImportFailureSink>);
        }
        let critical_points = CriticalPointRegistryService::new(
            Arc::new(PostgresCriticalPointRepository::new(pool)),
            clock,
        );

        let state = AppState::new(
            ingestion,
            import,
            critical_points,
            config.critical_point_paging,
        );
        Ok(Self {
            config: Arc::new(config),
            state,
        })
    }

    /// Serves requests until the process receives Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error when the listener cannot be bound or serving fails.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.listen_addr;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!(%addr, "hostwatch listening");
        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "could not listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
