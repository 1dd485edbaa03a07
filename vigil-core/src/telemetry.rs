//! Tracing subscriber setup for analysis sessions.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. Filter defaults to `info` and
/// can be overridden through `VIGIL_LOG` (standard env-filter syntax).
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("VIGIL_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
