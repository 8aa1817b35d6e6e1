//! Logger module
//!
//! Provides logging utilities for the service including:
//! - Subscriber initialization (text or JSON, stdout or file)
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

/// Initialize the global tracing subscriber
///
/// Should be called once at application startup. The returned guard must be
/// held until exit so buffered lines are flushed.
pub fn init(config: &Config) -> std::io::Result<WorkerGuard> {
    let logging = &config.logging;

    let writer: Box<dyn std::io::Write + Send + Sync> = match logging.file.as_deref() {
        Some(path) if !path.is_empty() => Box::new(open_log_file(path)?),
        _ => Box::new(std::io::stdout()),
    };
    let (non_blocking, guard) = tracing_appender::non_blocking(writer);

    let filter = tracing_subscriber::EnvFilter::try_new(&logging.level)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let builder = tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(logging.file.is_none());

    let installed = if logging.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| std::io::Error::new(std::io::ErrorKind::AlreadyExists, e))?;

    Ok(guard)
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> std::io::Result<std::fs::File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!(
        address = %addr,
        workers = ?config.server.workers,
        max_connections = ?config.performance.max_connections,
        "iptrace listening on http://{addr}"
    );
    tracing::info!(
        geo_url = %config.providers.geo_url,
        detail_url = %config.providers.detail_url,
        request_timeout_secs = config.providers.request_timeout,
        "upstream providers configured"
    );
}

pub fn log_shutdown(active_connections: usize) {
    tracing::info!(active_connections, "shutdown requested, draining connections");
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    tracing::error!("Failed to serve connection: {err}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
