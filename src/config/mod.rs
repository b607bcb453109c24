// Configuration module entry point
// Loads layered configuration and builds the shared application state

mod error;
mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use error::ConfigError;
pub use state::AppState;
pub use types::{
    default_valid_rdf_formats, Config, HttpConfig, LdpConfig, LoggingConfig, PerformanceConfig,
    ServerConfig,
};

/// Prefix for environment overrides, e.g. `STATIC_LDP__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "STATIC_LDP";

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, ENV_PREFIX)
    }

    fn load_with_env(config_path: &str, env_prefix: &str) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(config_path).required(false))
            .add_source(
                ::config::Environment::with_prefix(env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("ldp.source_directory", "data")?
            .set_default("ldp.default_rdf_format", "turtle")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_timeout", 10)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ConfigError::InvalidAddress(format!("{e}")))
    }
}
