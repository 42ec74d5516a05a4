//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Install the process-wide JSON subscriber, filtered by `RUST_LOG` and
/// defaulting to `info`. Repeated calls are no-ops, so tests can call it
/// freely.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .json()
        .try_init();
}
