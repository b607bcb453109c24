// Application state module
// Holds the validated configuration and the read-only format registry

use std::path::PathBuf;

use super::error::ConfigError;
use super::types::Config;
use crate::ldp::FormatRegistry;

/// Application state, shared read-only by every request
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub registry: FormatRegistry,
    /// Canonical source directory
    pub source_root: PathBuf,
}

impl AppState {
    /// Validate `config` and build the lookup tables.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let registry = FormatRegistry::new(config.ldp.valid_rdf_formats.clone())?;
        if registry
            .lookup_by_format_id(&config.ldp.default_rdf_format)
            .is_none()
        {
            return Err(ConfigError::UnknownDefaultFormat(
                config.ldp.default_rdf_format.clone(),
            ));
        }

        let source = PathBuf::from(&config.ldp.source_directory);
        let source_root = source
            .canonicalize()
            .map_err(|e| ConfigError::SourceDirectory {
                path: source.clone(),
                source: e,
            })?;
        if !source_root.is_dir() {
            return Err(ConfigError::NotADirectory(source_root));
        }

        Ok(Self {
            config,
            registry,
            source_root,
        })
    }

    pub fn default_format(&self) -> &str {
        &self.config.ldp.default_rdf_format
    }
}
