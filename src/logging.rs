//! Structured logging configuration
//!
//! Provides:
//! - JSON output for machine consumption
//! - Pretty formatting for interactive use
//! - Daily rolling log files through a non-blocking writer
//! - A per-run span carrying a unique run id
//!
//! Console output goes to stderr so stdout only ever carries the result.
//! `RUST_LOG` takes precedence over the configured level.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::Span;
use tracing_subscriber::filter::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use uuid::Uuid;

const LOG_FILE_PREFIX: &str = "license-calc.log";

/// Initialize the logging system based on configuration.
///
/// When logs go to a file the returned guard must be held until the program
/// exits, otherwise buffered lines are lost.
pub fn init_logging(config: &LoggingConfig, log_dir: &Path) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&config.level));

    match config.output.as_str() {
        "file" => init_file_logging(env_filter, &config.format, log_dir).map(Some),
        "both" => init_combined_logging(env_filter, &config.format, log_dir).map(Some),
        _ => {
            init_console_logging(env_filter, &config.format)?;
            Ok(None)
        }
    }
}

/// Filter for the configured level. Anything that is not a plain level
/// (`trace` .. `error`, `off`) or a `target=level` directive list falls back
/// to `info` with a notice.
fn level_filter(level: &str) -> EnvFilter {
    if level.parse::<LevelFilter>().is_ok() {
        return EnvFilter::new(level);
    }

    let has_directives = !level.trim().is_empty()
        && level.split(',').all(|directive| match directive.split_once('=') {
            Some((_, lvl)) => lvl.trim().parse::<LevelFilter>().is_ok(),
            None => directive.trim().parse::<LevelFilter>().is_ok(),
        });
    if has_directives {
        if let Ok(filter) = EnvFilter::try_new(level) {
            return filter;
        }
    }

    eprintln!("Invalid log level '{}', using info", level);
    EnvFilter::new("info")
}

fn init_console_logging(filter: EnvFilter, format: &str) -> Result<()> {
    let subscriber = tracing_subscriber::registry().with(filter);

    let installed = match format {
        "json" => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        _ => subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_ansi(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .pretty(),
            )
            .try_init(),
    };
    installed.context("Failed to install console logger")
}

fn file_writer(log_dir: &Path) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(file_appender))
}

fn init_file_logging(filter: EnvFilter, format: &str, log_dir: &Path) -> Result<WorkerGuard> {
    let (non_blocking, guard) = file_writer(log_dir)?;
    let subscriber = tracing_subscriber::registry().with(filter);

    let installed = match format {
        "json" => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init(),
        _ => subscriber
            .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
            .try_init(),
    };
    installed.context("Failed to install file logger")?;

    Ok(guard)
}

fn init_combined_logging(filter: EnvFilter, format: &str, log_dir: &Path) -> Result<WorkerGuard> {
    let (non_blocking, guard) = file_writer(log_dir)?;
    let subscriber = tracing_subscriber::registry().with(filter);

    let installed = match format {
        "json" => subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(fmt::layer().json().with_writer(non_blocking))
            .try_init(),
        _ => subscriber
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .try_init(),
    };
    installed.context("Failed to install combined logger")?;

    Ok(guard)
}

/// Span wrapping one calculation, tagged with a fresh run id.
pub fn run_span(application_id: &str, input: &str) -> Span {
    tracing::info_span!(
        "license_run",
        run_id = %Uuid::new_v4(),
        application_id = %application_id,
        input = %input
    )
}
