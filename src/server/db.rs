//! `PostgreSQL` connection pool construction.

use super::config::AppConfig;
use anyhow::{Context, Result};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use tracing::info;

/// Pooled `PostgreSQL` connections shared by every repository.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds the connection pool and checks that one connection can be opened.
///
/// # Errors
///
/// Returns an error when the pool cannot be built, which includes failing to
/// reach the database.
pub async fn connect_pool(config: &AppConfig) -> Result<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url.as_str());
    let max_size = config.max_pool_size;

    let pool = tokio::task::spawn_blocking(move || {
        Pool::builder().max_size(max_size).build(manager)
    })
    .await
    .context("connection pool task did not complete")?
    .context("failed to build PostgreSQL connection pool")?;

    info!(max_size, "database connection pool ready");
    Ok(pool)
}
