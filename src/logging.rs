use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
///
/// The returned guard flushes the file writer when dropped; keep it alive for
/// the whole run.
pub fn init_logging(directory: &str, file_prefix: &str) -> Option<WorkerGuard> {
    // Fall back to console-only logging when the directory can't be created
    let file_parts = fs::create_dir_all(directory).ok().map(|_| {
        let file_appender = tracing_appender::rolling::daily(directory, file_prefix);
        tracing_appender::non_blocking(file_appender)
    });

    let (file_layer, guard) = match file_parts {
        Some((writer, guard)) => (Some(fmt::layer().json().with_writer(writer)), Some(guard)),
        None => (None, None),
    };

    // Console goes to stderr; stdout carries the catalog echo
    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    // Respect RUST_LOG if set
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("flare_catalog=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}
