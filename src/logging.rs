//! Tracing subscriber initialisation.

use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: OnceCell<()> = OnceCell::new();

/// Installs the global `fmt` subscriber once.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Later calls are
/// no-ops.
pub fn init_tracing() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        if fmt().with_env_filter(filter).with_target(false).try_init().is_err() {
            tracing::debug!("a global tracing subscriber was already installed");
        }
    });
}
