//! Shared helpers for integration tests.

use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber once per test binary.
///
/// Filtering follows `RUST_LOG`; defaults to `ttl_lru=debug`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ttl_lru=debug")),
        )
        .with_test_writer()
        .try_init();
}
