use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize structured logging for the host application.
///
/// `RUST_LOG` wins over `level` when set. Returns `false` if a global
/// subscriber was already installed, in which case nothing changes.
pub fn init_tracing(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let installed = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        info!(level, "Logging initialized");
    }
    installed
}

