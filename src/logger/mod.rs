//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - Optional file targets for access and error lines

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use chrono::Local;
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;
use tracing::Level;

/// Initialize the logger with configuration
///
/// Installs the `tracing` subscriber and opens any configured log files.
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    install_subscriber(parse_level(&config.level));
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

/// Install the global `tracing` subscriber; `false` if one was already set
fn install_subscriber(level: Level) -> bool {
    match tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .try_init()
    {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!("Keeping existing tracing subscriber: {err}");
            false
        }
    }
}

/// Map a configured level name onto `tracing`, defaulting to info
pub fn parse_level(level: &str) -> Level {
    level.parse().unwrap_or(Level::INFO)
}

fn timestamped(level: &str, message: &str) -> String {
    format!("{} [{level}] {message}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, source_root: &std::path::Path) {
    tracing::info!("======================================");
    tracing::info!("Static LDP server started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Serving: {}", source_root.display());
    tracing::info!("Default RDF format: {}", config.ldp.default_rdf_format);
    for format in &config.ldp.valid_rdf_formats {
        tracing::info!(
            "  .{} -> {} ({})",
            format.extension,
            format.mime_type,
            format.format_id
        );
    }
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(ref path) = config.logging.access_log_file {
        tracing::info!("Access log: {path}");
    }
    if let Some(ref path) = config.logging.error_log_file {
        tracing::info!("Error log: {path}");
    }
    tracing::info!("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    tracing::debug!("[Request] {method} {uri} {version:?}");
}

pub fn log_error(message: &str) {
    if !writer::write_error(&timestamped("ERROR", message)) {
        tracing::error!("{message}");
    }
}

pub fn log_warning(message: &str) {
    if !writer::write_error(&timestamped("WARN", message)) {
        tracing::warn!("{message}");
    }
}

pub fn log_debug(message: &str) {
    tracing::debug!("{message}");
}

pub fn log_info(message: &str) {
    tracing::info!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    if !writer::write_access(&line) {
        tracing::info!(target: "access", "{line}");
    }
}
