//! Diagnostic logging setup.
//!
//! Library code only emits `tracing` events; binaries call [`init_logging`]
//! once to print them on stderr.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Resolves the filter: explicit directives, then `RUST_LOG`, then
/// [`DEFAULT_LOG_FILTER`]. Invalid directives fall through to the next source.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global stderr subscriber. A second call is a no-op.
pub fn init_logging(directives: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
