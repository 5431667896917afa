//! File-backed tracing for hosts embedding the engine.
//!
//! Log output goes to a per-run file under the platform's local data
//! directory; the level comes from `JOIN_KANBAN_LOG_LEVEL` and defaults to
//! `warn` so an embedded engine stays quiet unless asked.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_LEVEL_ENV: &str = "JOIN_KANBAN_LOG_LEVEL";
const DEFAULT_LEVEL: &str = "warn";

/// Install the file subscriber and return the log path together with the
/// writer guard. The host must hold the guard; dropping it stops the
/// background writer and loses buffered lines.
pub fn init_logging() -> Result<(PathBuf, WorkerGuard)> {
    let dir = log_directory()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory '{}'", dir.display()))?;

    let path = dir.join(log_file_name(Local::now()));
    let file = fs::File::create(&path)
        .with_context(|| format!("failed to create log file '{}'", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_log_filter())
        .with(file_layer)
        .init();

    tracing::info!(path = %path.display(), "logging initialized");
    Ok((path, guard))
}

fn build_log_filter() -> EnvFilter {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|raw| parse_level(&raw))
        .unwrap_or(DEFAULT_LEVEL);
    EnvFilter::new(format!("{level},join_kanban={level}"))
}

fn parse_level(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

pub fn log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().context("no local data directory available")?;
    Ok(base.join("join-kanban").join("logs"))
}

fn log_file_name(now: DateTime<Local>) -> String {
    format!("drag-engine-{}.log", now.format("%Y-%m-%d_%H-%M-%S"))
}
