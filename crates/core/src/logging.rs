use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Directory holding the rolling log files, `~/.xtc/logs`.
pub fn log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".xtc")
        .join("logs")
}

/// Installs the global subscriber: a daily rolling file under [`log_dir`] and,
/// when `to_stderr` is set, a colored stderr layer. Keep the guard alive for the
/// lifetime of the process or buffered lines are lost.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    init_logging_in(&log_dir(), component, to_stderr)
}

pub fn init_logging_in(dir: &std::path::Path, component: &str, to_stderr: bool) -> WorkerGuard {
    let _ = std::fs::create_dir_all(dir);

    // Files are named like lsp.log.2024-01-21
    let file_appender = tracing_appender::rolling::daily(dir, format!("{component}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    // A second init (tests, embedding) keeps the first subscriber.
    let installed = if to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry.with(stderr_layer).try_init()
    } else {
        registry.try_init()
    };
    if installed.is_err() {
        tracing::debug!("Global subscriber already installed; '{}' logs go to it", component);
    }

    guard
}
