//! Logging initialization

use anyhow::{Context, Result};
use proxifier_core::config::LoggingSettings;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::args::{Args, LogFormat};

/// Initialize logging from CLI arguments, falling back to `[logging]`
///
/// Logs go to stderr so that stdout carries only command output. The
/// returned guard flushes the log file and must live until exit.
pub fn init(args: &Args, settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    // Determine default level
    let level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => settings.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    // RUST_LOG wins over flags and settings
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level: {level}"))?,
    };

    let format = args.log_format.unwrap_or(if settings.json_format {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    let (file_writer, guard) = match args.log_file.as_deref().or(settings.file.as_deref()) {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(open_log_file(path)?);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(args.verbose >= 2)
                    .with_thread_ids(args.verbose >= 3)
                    .with_file(args.verbose >= 3)
                    .with_line_number(args.verbose >= 3),
            )
            .with(file_writer.map(|w| fmt::layer().with_ansi(false).with_writer(w)))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(file_writer.map(|w| fmt::layer().json().with_writer(w)))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .with(file_writer.map(|w| fmt::layer().compact().with_ansi(false).with_writer(w)))
            .try_init(),
    };
    result.context("Failed to install log subscriber")?;

    Ok(guard)
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))
}
