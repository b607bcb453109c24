// Configuration types module
// Defines all configuration-related data structures

use crate::ldp::FormatDescriptor;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ldp: LdpConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Public base URL used for subject URIs instead of the `Host` header
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Served tree and RDF formats
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LdpConfig {
    pub source_directory: String,
    pub default_rdf_format: String,
    /// Ordered: also the negotiation search order
    #[serde(default = "default_valid_rdf_formats")]
    pub valid_rdf_formats: Vec<FormatDescriptor>,
}

pub fn default_valid_rdf_formats() -> Vec<FormatDescriptor> {
    vec![
        FormatDescriptor::new("ttl", "text/turtle", "turtle"),
        FormatDescriptor::new("jsonld", "application/ld+json", "jsonld"),
        FormatDescriptor::new("nt", "application/n-triples", "ntriples"),
        FormatDescriptor::new("rdf", "application/rdf+xml", "rdfxml"),
    ]
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
    /// Seconds to wait for in-flight connections on shutdown
    pub shutdown_timeout: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HttpConfig {
    #[serde(default)]
    pub enable_cors: bool,
}
