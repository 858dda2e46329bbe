//! Structured logging bootstrap for fleetsim binaries.
//!
//! Log level is taken from `RUST_LOG`; output format is human-readable by
//! default and JSON when `FLEETSIM_LOG_JSON=1`, suitable for aggregation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging for the current process.
///
/// Honors `RUST_LOG` for filtering and `FLEETSIM_LOG_JSON` for format.
/// Must be called at most once per process.
///
/// # Example
/// ```no_run
/// fleetsim_core::logging::init();
/// tracing::info!("node started");
/// ```
pub fn init() {
    if std::env::var("FLEETSIM_LOG_JSON").map(|v| v == "1").unwrap_or(false) {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt::layer().with_target(true))
            .init();
    }
}

/// Initialize logging with an explicit filter directive, ignoring `RUST_LOG`.
/// Used by tests and tools that need a fixed level.
pub fn init_with_filter(directive: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::new(directive))
        .with(fmt::layer().with_target(true))
        .init();
}
