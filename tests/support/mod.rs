//! Shared helpers for integration tests.

pub mod pages;
pub mod socket_guard;

/// Installs a test-writer tracing subscriber once; honours `RUST_LOG`.
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
