//! Hostwatch HTTP service entry point.
//!
//! Configuration is read from `HOSTWATCH_*` environment variables; see
//! [`hostwatch::server::config::AppConfig`].

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hostwatch::logging::init_tracing();
    hostwatch::run().await
}
