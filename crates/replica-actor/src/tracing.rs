//! # Tracing Setup
//!
//! One place to install the global subscriber so binaries and tests log alike.
//! Filtering follows `RUST_LOG`; without it only `info` and above is shown.

use tracing_subscriber::EnvFilter;

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once: later calls are ignored, so every test can call it.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
