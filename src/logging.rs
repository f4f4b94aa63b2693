use std::fs;
use std::path::Path;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
pub fn init_logging(log_dir: &Path) {
    let _ = fs::create_dir_all(log_dir);

    // Non-blocking file appender with daily rotation
    let file_appender = tracing_appender::rolling::daily(log_dir, "tabular_etl.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("tabular_etl=info".parse().unwrap()))
        .with(file_layer)
        .with(console_layer)
        .init();

    // Keep the guard alive so buffered lines are flushed on exit
    std::mem::forget(guard);
}
