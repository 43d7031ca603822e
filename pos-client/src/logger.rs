//! Logging Infrastructure
//!
//! Installs a `tracing` subscriber for applications embedding the client.

use tracing_subscriber::EnvFilter;

/// Initialize the logger at `info`
pub fn init_logger() {
    init_logger_with_level(None);
}

/// Initialize the logger, `RUST_LOG` overrides the given level.
///
/// Repeat calls are ignored.
pub fn init_logger_with_level(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .try_init();
}
