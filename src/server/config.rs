//! Environment-driven configuration for the HTTP service.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use serde::Deserialize;
use std::net::{SocketAddr, ToSocketAddrs};

/// Default page size and upper bound for critical point listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriticalPointPaging {
    /// Page size used when a request gives no `limit`.
    pub default_limit: usize,
    /// Largest page size a request may ask for.
    pub max_limit: usize,
}

impl CriticalPointPaging {
    /// Creates paging bounds, raising `max_limit` to at least
    /// `default_limit` and `default_limit` to at least one.
    #[must_use]
    pub fn new(default_limit: usize, max_limit: usize) -> Self {
        let page_size = default_limit.max(1);
        Self {
            default_limit: page_size,
            max_limit: max_limit.max(page_size),
        }
    }

    /// Resolves the page size for a request.
    #[must_use]
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .min(self.max_limit)
    }
}

impl Default for CriticalPointPaging {
    fn default() -> Self {
        Self::new(default_page_limit(), default_max_page_limit())
    }
}

/// Resolved service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address the HTTP listener binds to.
    pub listen_addr: SocketAddr,
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Maximum number of pooled database connections.
    pub max_pool_size: u32,
    /// Critical point listing bounds.
    pub critical_point_paging: CriticalPointPaging,
    /// Directory receiving the failed-row report of each bulk import.
    pub failed_rows_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    hostwatch_listen_addr: Option<String>,
    #[serde(default)]
    hostwatch_listen_host: Option<String>,
    #[serde(default)]
    hostwatch_listen_port: Option<u16>,
    #[serde(default)]
    hostwatch_database_url: Option<String>,
    #[serde(default)]
    database_url: Option<String>,
    #[serde(default = "default_pool_size")]
    hostwatch_max_pool_size: u32,
    #[serde(default = "default_page_limit")]
    hostwatch_critical_point_page_limit: usize,
    #[serde(default = "default_max_page_limit")]
    hostwatch_critical_point_max_limit: usize,
    #[serde(default)]
    hostwatch_failed_rows_dir: Option<Utf8PathBuf>,
}

const fn default_pool_size() -> u32 {
    10
}

const fn default_page_limit() -> usize {
    10
}

const fn default_max_page_limit() -> usize {
    500
}

impl AppConfig {
    /// Reads `HOSTWATCH_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable cannot be parsed, the listen address
    /// does not resolve, or no database URL is set.
    pub fn from_env() -> Result<Self> {
        let raw: RawConfig =
            envy::from_env().context("failed to parse HOSTWATCH_* environment variables")?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        let listen_addr = resolve_addr(
            raw.hostwatch_listen_addr,
            raw.hostwatch_listen_host,
            raw.hostwatch_listen_port,
        )?;

        let database_url = raw
            .hostwatch_database_url
            .or(raw.database_url)
            .context("HOSTWATCH_DATABASE_URL or DATABASE_URL must be set")?;

        Ok(Self {
            listen_addr,
            database_url,
            max_pool_size: raw.hostwatch_max_pool_size.max(1),
            critical_point_paging: CriticalPointPaging::new(
                raw.hostwatch_critical_point_page_limit,
                raw.hostwatch_critical_point_max_limit,
            ),
            failed_rows_dir: raw.hostwatch_failed_rows_dir,
        })
    }
}

fn resolve_addr(
    addr: Option<String>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<SocketAddr> {
    if let Some(explicit) = addr {
        return explicit
            .to_socket_addrs()
            .context("invalid HOSTWATCH_LISTEN_ADDR value")?
            .next()
            .context("HOSTWATCH_LISTEN_ADDR resolved to no addresses");
    }

    let combined = format!(
        "{}:{}",
        host.as_deref().unwrap_or("0.0.0.0"),
        port.unwrap_or(8000)
    );
    combined
        .to_socket_addrs()
        .context("invalid HOSTWATCH listen host/port combination")?
        .next()
        .context("listen address resolved to no targets")
}
